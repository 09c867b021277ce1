//! Keyboard/mouse state polled once per frame by the camera.

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Accumulated input between frames: WASD axes + raw mouse deltas.
#[derive(Debug, Default)]
pub struct InputState {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
    mouse_dx: f32,
    mouse_dy: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, event: &KeyEvent) {
        let pressed = event.state == ElementState::Pressed;
        match event.physical_key {
            PhysicalKey::Code(KeyCode::KeyW) => self.forward = pressed,
            PhysicalKey::Code(KeyCode::KeyS) => self.back = pressed,
            PhysicalKey::Code(KeyCode::KeyA) => self.left = pressed,
            PhysicalKey::Code(KeyCode::KeyD) => self.right = pressed,
            _ => {}
        }
    }

    pub fn add_mouse_delta(&mut self, dx: f64, dy: f64) {
        self.mouse_dx += dx as f32;
        self.mouse_dy += dy as f32;
    }

    /// -1..1 movement axis along the camera front.
    pub fn forward_axis(&self) -> f32 {
        (self.forward as i8 - self.back as i8) as f32
    }

    /// -1..1 strafe axis along the camera right.
    pub fn strafe_axis(&self) -> f32 {
        (self.right as i8 - self.left as i8) as f32
    }

    /// Drain the mouse delta accumulated since the last frame.
    pub fn take_mouse_delta(&mut self) -> (f32, f32) {
        (
            std::mem::take(&mut self.mouse_dx),
            std::mem::take(&mut self.mouse_dy),
        )
    }
}
