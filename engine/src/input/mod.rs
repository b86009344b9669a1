//! Input Module
//!
//! Platform-agnostic input mapping for the camera rig. The driver forwards
//! its window events into an [`InputState`], hands the current frame to a
//! [`RigController`], then clears the frame.
//!
//! # Example
//!
//! ```rust,ignore
//! use tailcam_engine::input::{InputState, KeyCode, MouseButton, RigController};
//!
//! let mut controller = RigController::default();
//! let mut input = InputState::new();
//!
//! // From the event loop
//! input.handle_key(KeyCode::W, true);
//! input.handle_mouse_motion(4.0, -1.0);
//! input.handle_button(MouseButton::Left, true);
//!
//! // Once per frame, before rig.tick(dt)
//! controller.apply(&mut rig, input.frame(), dt);
//! let walk = input.camera_space_movement(&rig.pose());
//! input.end_frame();
//! ```

pub mod bindings;
pub mod controller;
pub mod frame;
pub mod keyboard;

pub use bindings::{KeyBindings, RigAction};
pub use controller::{RigController, SCROLL_DEAD_ZONE, move_input_to_camera_space};
pub use frame::{FrameInput, MouseButton};
pub use keyboard::{KeyCode, MovementKeys};

use glam::{Vec2, Vec3};

use crate::camera::CameraPose;

/// Held movement keys plus the edges and deltas gathered this frame.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub movement: MovementKeys,
    frame: FrameInput,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        self.movement.handle_key(key, pressed);
        if pressed {
            self.frame.press_key(key);
        } else {
            self.frame.release_key(key);
        }
        self.frame.movement = Vec2::new(
            self.movement.horizontal_axis(),
            self.movement.vertical_axis(),
        );
    }

    /// Accumulate look motion; positive `dy` looks up.
    pub fn handle_mouse_motion(&mut self, dx: f32, dy: f32) {
        self.frame.look += Vec2::new(dx, dy);
    }

    pub fn handle_scroll(&mut self, delta: f32) {
        self.frame.scroll += delta;
    }

    pub fn handle_button(&mut self, button: MouseButton, pressed: bool) {
        self.frame.set_button(button, pressed);
    }

    /// The input gathered since the last [`end_frame`](Self::end_frame).
    pub fn frame(&self) -> &FrameInput {
        &self.frame
    }

    /// Held movement keys mapped onto the camera's ground plane.
    pub fn camera_space_movement(&self, pose: &CameraPose) -> Vec3 {
        move_input_to_camera_space(pose, self.frame.movement.x, self.frame.movement.y)
    }

    pub fn end_frame(&mut self) {
        self.frame.clear();
    }

    /// Reset all input state to defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_survive_end_frame() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::W, true);
        input.handle_mouse_motion(2.0, 1.0);
        input.handle_mouse_motion(1.0, 0.0);
        input.handle_scroll(0.5);

        assert_eq!(input.frame().look, Vec2::new(3.0, 1.0));
        assert_eq!(input.frame().scroll, 0.5);
        assert!(input.frame().keys_pressed().contains(&KeyCode::W));

        input.end_frame();
        assert!(input.frame().keys_pressed().is_empty());
        assert_eq!(input.frame().movement, Vec2::new(0.0, 1.0));

        input.handle_key(KeyCode::W, false);
        assert_eq!(input.frame().movement, Vec2::ZERO);
        assert!(input.frame().keys_released().contains(&KeyCode::W));
    }

    #[test]
    fn test_camera_space_movement() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::D, true);
        let walk = input.camera_space_movement(&CameraPose::default());
        assert!((walk - Vec3::X).length() < 1e-5);

        input.reset();
        assert_eq!(input.camera_space_movement(&CameraPose::default()), Vec3::ZERO);
    }
}
