use nalgebra as na;
use na::{vector, Vector3, Vector4};

/// Smallest |w| still accepted by the perspective divide.
pub const W_EPSILON: f32 = 1e-6;

/// Transformation of a point to homogenous coordinates.
pub fn to_hom_point(v: Vector3<f32>) -> Vector4<f32> {
    return vector![v.x, v.y, v.z, 1.0];
}

/// Transformation of a point from homogenous coordinates.
/// Returns None if w is too close to zero or the result is not finite, meaning the point sits on
/// the camera plane and can't be projected.
pub fn from_hom_point(v: Vector4<f32>) -> Option<Vector3<f32>> {
    if !(v.w.abs() >= W_EPSILON) {
        return None;
    }
    let p = vector![v.x / v.w, v.y / v.w, v.z / v.w];
    if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
        return None;
    }
    return Some(p);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divides_by_w() {
        let p = from_hom_point(vector![2.0, 4.0, 6.0, 2.0]).unwrap();
        assert_eq!(p, vector![1.0, 2.0, 3.0]);
    }

    #[test]
    fn rejects_zero_and_nan_w() {
        assert!(from_hom_point(vector![1.0, 1.0, 1.0, 0.0]).is_none());
        assert!(from_hom_point(vector![1.0, 1.0, 1.0, 1e-9]).is_none());
        assert!(from_hom_point(vector![1.0, 1.0, 1.0, f32::NAN]).is_none());
        assert!(from_hom_point(vector![f32::INFINITY, 1.0, 1.0, 1.0]).is_none());
    }

    #[test]
    fn hom_point_has_unit_w() {
        assert_eq!(to_hom_point(vector![1.0, 2.0, 3.0]).w, 1.0);
    }
}
