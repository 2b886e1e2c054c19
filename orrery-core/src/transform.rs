/// 4x4 transformation matrices and the discrete convergence rule
use nalgebra::{Matrix4, Point3, Unit, Vector3};

/// Transform builder for 3D transformations.
///
/// Matrices compose right to left: in `a * b` the body is transformed by `b`
/// first, then by `a`.
pub struct Transform;

impl Transform {
    /// Rotation of `angle` radians about `axis` (normalized internally)
    pub fn rotation(angle: f32, axis: &Vector3<f32>) -> Matrix4<f32> {
        match Unit::try_new(*axis, f32::EPSILON) {
            Some(axis) => Matrix4::from_axis_angle(&axis, angle),
            None => Matrix4::identity(),
        }
    }

    /// Create a translation matrix
    pub fn translation(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    /// Create a uniform scale matrix
    pub fn scale(factor: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(factor)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }

    /// Where a model matrix places the body's local origin
    pub fn origin_of(model: &Matrix4<f32>) -> Point3<f32> {
        model.transform_point(&Point3::origin())
    }
}

/// One step of discrete exponential convergence: `from + rate * (to - from)`.
///
/// For `rate` in (0, 1) repeated steps approach `to` without reaching it.
/// A negative rate moves away from `to` along the same line.
pub fn converge(from: &Point3<f32>, to: &Point3<f32>, rate: f32) -> Point3<f32> {
    from + (to - from) * rate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rotation_is_identity() {
        let matrix = Transform::rotation(0.0, &Vector3::z());
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_degenerate_axis_is_identity() {
        let matrix = Transform::rotation(1.0, &Vector3::zeros());
        assert_eq!(matrix, Matrix4::identity());
    }

    #[test]
    fn test_quarter_turn_about_z() {
        let matrix = Transform::rotation(std::f32::consts::FRAC_PI_2, &Vector3::z());
        let p = matrix.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_rightmost_transform_applies_first() {
        let translate = Transform::translation(&Vector3::new(10.0, 0.0, 0.0));
        let scale = Transform::scale(0.5);
        let p = Transform::origin_of(&(translate * scale));
        assert!((p - Point3::new(10.0, 0.0, 0.0)).norm() < 1e-6);
        let q = (scale * translate).transform_point(&Point3::origin());
        assert!((q - Point3::new(5.0, 0.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_converge_moves_a_fraction_of_the_gap() {
        let p = converge(&Point3::new(100.0, 0.0, 0.0), &Point3::origin(), 0.01);
        assert!((p.x - 99.0).abs() < 1e-4);
        let q = converge(&Point3::new(100.0, 0.0, 0.0), &Point3::origin(), -0.01);
        assert!((q.x - 101.0).abs() < 1e-4);
    }
}
