//! Core types: math re-exports, Transform, FlyCamera.

pub use glam::{Mat4, Quat, Vec3, vec3};

pub mod camera;
pub mod transform;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_identity_matrix() {
        let t = transform::Transform::identity();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn transform_applies_translation_and_scale() {
        let t = transform::Transform {
            translation: vec3(1.0, 2.0, 3.0),
            yaw: 0.0,
            scale: 2.0,
        };
        let m = t.matrix().to_cols_array();
        assert!((m[12] - 1.0).abs() < 1e-6);
        assert!((m[13] - 2.0).abs() < 1e-6);
        assert!((m[14] - 3.0).abs() < 1e-6);
        assert!((m[0] - 2.0).abs() < 1e-6);
        assert!((m[5] - 2.0).abs() < 1e-6);
        assert!((m[10] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = camera::FlyCamera::new(vec3(0.0, 0.0, 4.0), 16.0 / 9.0);
        let front = cam.front();
        assert!((front.x).abs() < 1e-6);
        assert!((front.y).abs() < 1e-6);
        assert!((front.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = camera::FlyCamera::new(Vec3::ZERO, 1.0);
        cam.look(0.0, -10_000.0);
        assert!(cam.pitch <= 89.0);
        cam.look(0.0, 10_000.0);
        assert!(cam.pitch >= -89.0);
    }

    #[test]
    fn camera_pv_is_finite() {
        let cam = camera::FlyCamera::new(vec3(0.0, 1.0, 4.0), 16.0 / 9.0);
        let pv = cam.proj_view();
        assert!(pv.to_cols_array().iter().all(|f| f.is_finite()));
    }
}
