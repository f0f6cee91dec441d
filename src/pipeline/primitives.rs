use nalgebra::Vector3;

use super::color::Color;

/// Point flowing into and out of the vertex stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3<f32>,
    pub color: Color,
}

/// Candidate pixel write - x, y give screen position and z gives the interpolated depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub position: Vector3<f32>,
    pub color: Color,
}

/// Three screen-space vertices, winding is the order they came in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Vertex,
    pub b: Vertex,
    pub c: Vertex,
}

impl Vertex {
    pub fn new(position: Vector3<f32>, color: Color) -> Self {
        return Self { position, color };
    }
}

impl Fragment {
    pub fn new(position: Vector3<f32>, color: Color) -> Self {
        return Self { position, color };
    }
}

impl Triangle {
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        return Self { a, b, c };
    }

    /// Builds a triangle out of vertex stage output, None if any corner got clipped.
    pub fn from_clipped(corners: [Option<Vertex>; 3]) -> Option<Self> {
        match corners {
            [Some(a), Some(b), Some(c)] => Some(Self { a, b, c }),
            _ => None,
        }
    }
}
