use nalgebra::Matrix4;

use super::primitives::Vertex;
use super::uniforms::TransformContext;
use crate::util::{from_hom_point, to_hom_point};

/// Vertex shader - takes model space vertices to screen space.
/// The transform is composed once when the stage is built and reused for every vertex of the frame.
pub struct VertexStage {
    vpvm_matrix: Matrix4<f32>,
}

impl VertexStage {
    pub fn new(transform: &TransformContext) -> Self {
        return Self { vpvm_matrix: transform.vpvm_matrix() };
    }

    /// Transforms a vertex and does the perspective divide.
    /// A vertex landing on the camera plane (w near zero) counts as clipped and gives None.
    pub fn transform(&self, vertex: &Vertex) -> Option<Vertex> {
        let position = from_hom_point(self.vpvm_matrix * to_hom_point(vertex.position))?;
        return Some(Vertex { position, color: vertex.color });
    }
}
