use nalgebra as na;
use na::{vector, Matrix4, Vector3};

/// Per-frame transform matrices. The pipeline applies them as
/// viewport * projection * view * model * position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformContext {
    pub model: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub viewport: Matrix4<f32>,
}

/// Single directional light used for flat shading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    direction: Vector3<f32>, // Unit length.
    pub gain: f32,
}

/// Everything the pipeline reads during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Uniforms {
    pub transform: TransformContext,
    pub lighting: Lighting,
}

impl TransformContext {
    pub fn identity() -> Self {
        return Self {
            model: Matrix4::identity(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            viewport: Matrix4::identity(),
        };
    }

    /// Single matrix taking model space straight to screen space.
    pub fn vpvm_matrix(&self) -> Matrix4<f32> {
        return self.viewport * self.projection * self.view * self.model;
    }
}

impl Default for TransformContext {
    fn default() -> Self {
        return Self::identity();
    }
}

impl Lighting {
    /// Direction gets normalized, a zero direction falls back to +z.
    pub fn new(direction: Vector3<f32>, gain: f32) -> Self {
        let direction = direction
            .try_normalize(f32::EPSILON)
            .unwrap_or(vector![0.0, 0.0, 1.0]);
        return Self { direction, gain };
    }

    pub fn direction(&self) -> Vector3<f32> {
        return self.direction;
    }

    /// Light intensity for a face with the given unit normal, not clamped.
    pub fn intensity(&self, normal: Vector3<f32>) -> f32 {
        return normal.dot(&self.direction) * self.gain;
    }
}

impl Default for Lighting {
    fn default() -> Self {
        return Self::new(vector![0.5, 0.5, 1.0], 10.0);
    }
}

impl Uniforms {
    pub fn new(transform: TransformContext, lighting: Lighting) -> Self {
        return Self { transform, lighting };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_light_is_normalized() {
        let lighting = Lighting::default();
        assert!((lighting.direction().norm() - 1.0).abs() < 1e-6);
        assert_eq!(lighting.gain, 10.0);
    }

    #[test]
    fn intensity_scales_with_gain() {
        let lighting = Lighting::new(vector![0.0, 0.0, 2.0], 0.5);
        assert!((lighting.intensity(vector![0.0, 0.0, 1.0]) - 0.5).abs() < 1e-6);
        assert!((lighting.intensity(vector![0.0, 0.0, -1.0]) + 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_direction_falls_back() {
        let lighting = Lighting::new(Vector3::zeros(), 1.0);
        assert_eq!(lighting.direction(), vector![0.0, 0.0, 1.0]);
    }

    #[test]
    fn composition_order() {
        let transform = TransformContext {
            model: Matrix4::new_translation(&vector![1.0, 0.0, 0.0]),
            view: Matrix4::new_scaling(2.0),
            projection: Matrix4::identity(),
            viewport: Matrix4::identity(),
        };
        // Translate first, then scale.
        let p = transform.vpvm_matrix() * vector![0.0, 0.0, 0.0, 1.0];
        assert_eq!(p, vector![2.0, 0.0, 0.0, 1.0]);
    }
}
