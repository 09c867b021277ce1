use crate::{Mat4, Quat, Vec3};

/// Model placement: translation, yaw about +Y, uniform scale.
/// All the demo scene needs to position one loaded model.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub translation: Vec3,
    /// Radians.
    pub yaw: f32,
    pub scale: f32,
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            yaw: 0.0,
            scale: 1.0,
        }
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.yaw),
            self.translation,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
