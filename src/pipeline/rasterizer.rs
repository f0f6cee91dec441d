use nalgebra as na;
use na::{vector, Vector3};

use super::color::Color;
use super::primitives::{Fragment, Triangle};
use super::uniforms::Lighting;

/// Integer pixel rectangle, both corners included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub ll: (i64, i64), // lower left corner
    pub ur: (i64, i64), // upper right corner
}

impl BoundingBox {
    /// Pixel aligned box around a triangle: floor of the minimum, ceil of the maximum.
    pub fn of_triangle(triangle: &Triangle) -> Self {
        let (a, b, c) = (triangle.a.position, triangle.b.position, triangle.c.position);
        return Self {
            ll: (
                a.x.min(b.x).min(c.x).floor() as i64,
                a.y.min(b.y).min(c.y).floor() as i64,
            ),
            ur: (
                a.x.max(b.x).max(c.x).ceil() as i64,
                a.y.max(b.y).max(c.y).ceil() as i64,
            ),
        };
    }

    /// Whole area of a width x height target.
    pub fn of_target(width: u32, height: u32) -> Self {
        return Self {
            ll: (0, 0),
            ur: (width as i64 - 1, height as i64 - 1),
        };
    }

    /// Overlap of two boxes, may come out empty.
    pub fn intersect(&self, other: &BoundingBox) -> Self {
        return Self {
            ll: (self.ll.0.max(other.ll.0), self.ll.1.max(other.ll.1)),
            ur: (self.ur.0.min(other.ur.0), self.ur.1.min(other.ur.1)),
        };
    }

    pub fn is_empty(&self) -> bool {
        return self.ll.0 > self.ur.0 || self.ll.1 > self.ur.1;
    }
}

/// Twice the signed screen area of a, b, c. None when it is too small to divide by.
fn doubled_area(a: Vector3<f32>, b: Vector3<f32>, c: Vector3<f32>) -> Option<f32> {
    let denominator = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if !(denominator.abs() >= f32::EPSILON) {
        return None;
    }
    return Some(denominator);
}

/// Each weight is its own edge function over `denominator`, so a pixel lying exactly on an
/// edge gets an exact 0 instead of a rounding error from 1 - w - v.
fn weights(
    p: Vector3<f32>,
    a: Vector3<f32>,
    b: Vector3<f32>,
    c: Vector3<f32>,
    denominator: f32,
) -> Vector3<f32> {
    let w = ((b.y - c.y) * (p.x - c.x) + (c.x - b.x) * (p.y - c.y)) / denominator;
    let v = ((c.y - a.y) * (p.x - c.x) + (a.x - c.x) * (p.y - c.y)) / denominator;
    let u = ((a.y - b.y) * (p.x - a.x) + (b.x - a.x) * (p.y - a.y)) / denominator;
    return vector![w, v, u];
}

/// Barycentric coordinates (w, v, u) of p relative to a, b, c - weights of a, b and c respectively.
/// Only x and y take part. None for a triangle with no area on screen.
pub fn barycentric(
    p: Vector3<f32>,
    a: Vector3<f32>,
    b: Vector3<f32>,
    c: Vector3<f32>,
) -> Option<Vector3<f32>> {
    return doubled_area(a, b, c).map(|denominator| weights(p, a, b, c, denominator));
}

/// Inclusive on the edges, shared edges of neighbouring triangles get covered by both.
pub fn is_inside(bar_coord: Vector3<f32>) -> bool {
    return bar_coord.iter().all(|weight| (0.0..=1.0).contains(weight));
}

/// Turns triangles into flat shaded fragments.
pub struct Rasterizer {
    lighting: Lighting,
    scissor: Option<BoundingBox>,
}

impl Rasterizer {
    pub fn new(lighting: Lighting) -> Self {
        return Self { lighting, scissor: None };
    }

    /// Restricts produced fragments to a width x height target.
    pub fn with_target_bounds(mut self, width: u32, height: u32) -> Self {
        self.scissor = Some(BoundingBox::of_target(width, height));
        return self;
    }

    /// Face normal from the winding a -> b -> c, None for a collapsed triangle.
    pub fn face_normal(triangle: &Triangle) -> Option<Vector3<f32>> {
        let (a, b, c) = (triangle.a.position, triangle.b.position, triangle.c.position);
        return (b - a).cross(&(c - a)).try_normalize(f32::EPSILON);
    }

    /// Fragments for every pixel center inside the triangle.
    /// Degenerate triangles give an empty vec.
    pub fn rasterize(&self, triangle: &Triangle) -> Vec<Fragment> {
        let mut fragments = Vec::new();
        self.rasterize_into(triangle, &mut fragments);
        return fragments;
    }

    /// Same as `rasterize`, appending to an existing buffer. Returns false if the triangle was
    /// degenerate.
    pub fn rasterize_into(&self, triangle: &Triangle, fragments: &mut Vec<Fragment>) -> bool {
        let (a, b, c) = (triangle.a.position, triangle.b.position, triangle.c.position);
        let normal = match Self::face_normal(triangle) {
            Some(normal) => normal,
            None => return false,
        };
        // Checked before the box, so a collapsed triangle is dropped even when it is off screen.
        let denominator = match doubled_area(a, b, c) {
            Some(denominator) => denominator,
            None => return false,
        };

        let intensity = self.lighting.intensity(normal);
        let color = Color::grey(intensity);

        let mut bbox = BoundingBox::of_triangle(triangle);
        if let Some(scissor) = &self.scissor {
            bbox = bbox.intersect(scissor);
        }
        if bbox.is_empty() {
            return true;
        }

        for y in bbox.ll.1..=bbox.ur.1 {
            for x in bbox.ll.0..=bbox.ur.0 {
                let mut p = vector![x as f32, y as f32, 0.0];
                let bar_coord = weights(p, a, b, c, denominator);
                if !is_inside(bar_coord) {
                    continue;
                }
                // Relative to c, so equal vertex depths come out exact.
                p.z = c.z + bar_coord.x * (a.z - c.z) + bar_coord.y * (b.z - c.z);
                fragments.push(Fragment::new(p, color));
            }
        }
        return true;
    }
}
