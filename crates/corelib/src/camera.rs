use crate::{Mat4, Vec3};

/// Degrees of yaw/pitch per pixel of mouse travel.
const MOUSE_SENSITIVITY: f32 = 0.15;
/// Movement speed in world units per second.
const MOVE_SPEED: f32 = 3.0;
/// Keep pitch off the poles so the view basis stays well-defined.
const PITCH_LIMIT: f32 = 89.0;

/// Free-flying perspective camera (right-handed).
///
/// Orientation is yaw/pitch in degrees; yaw -90 looks down -Z. Movement is
/// applied along the current front/right vectors.
#[derive(Clone, Copy, Debug)]
pub struct FlyCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
}

impl FlyCamera {
    pub fn new(position: Vec3, aspect: f32) -> Self {
        Self {
            position,
            yaw: -90.0,
            pitch: 0.0,
            fov_y_rad: 60f32.to_radians(),
            z_near: 0.1,
            z_far: 100.0,
            aspect,
        }
    }

    pub fn front(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.front().cross(Vec3::Y).normalize()
    }

    /// Apply a mouse delta in pixels.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * MOUSE_SENSITIVITY;
        self.pitch = (self.pitch - dy * MOUSE_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Move along front/right. `forward`/`strafe` are -1..1 axis values.
    pub fn advance(&mut self, forward: f32, strafe: f32, dt: f32) {
        let step = MOVE_SPEED * dt;
        self.position += self.front() * (forward * step) + self.right() * (strafe * step);
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front(), Vec3::Y)
    }

    /// wgpu-style projection (z in [0,1]).
    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_rad,
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        self.proj() * self.view()
    }

    #[inline]
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }
}
