//! One frame of camera input: look and scroll deltas plus key and mouse
//! button edges. The driver fills it from its windowing events and hands it to
//! [`RigController`](super::RigController).

use std::collections::HashSet;

use glam::Vec2;

use super::KeyCode;

/// Mouse button identifiers, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// Additional mouse buttons (button 4, 5, etc.)
    Other(u16),
}

#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Look delta; positive y looks up
    pub look: Vec2,
    /// Scroll wheel delta; positive zooms out
    pub scroll: f32,
    /// Stick-style move input (x = horizontal, y = vertical)
    pub movement: Vec2,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_look(mut self, x: f32, y: f32) -> Self {
        self.look = Vec2::new(x, y);
        self
    }

    pub fn with_scroll(mut self, scroll: f32) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn with_key_pressed(mut self, key: KeyCode) -> Self {
        self.press_key(key);
        self
    }

    pub fn with_key_released(mut self, key: KeyCode) -> Self {
        self.release_key(key);
        self
    }

    pub fn press_key(&mut self, key: KeyCode) {
        self.keys_pressed.insert(key);
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_released.insert(key);
    }

    /// Record a mouse button transition.
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.buttons_pressed.insert(button);
        } else {
            self.buttons_released.insert(button);
        }
    }

    /// Keys that went down this frame.
    pub fn keys_pressed(&self) -> &HashSet<KeyCode> {
        &self.keys_pressed
    }

    /// Keys that came up this frame.
    pub fn keys_released(&self) -> &HashSet<KeyCode> {
        &self.keys_released
    }

    pub fn button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Clear deltas and edges for the next frame. `movement` is kept since it
    /// reflects held keys.
    pub fn clear(&mut self) {
        self.look = Vec2::ZERO;
        self.scroll = 0.0;
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_keeps_movement() {
        let mut input = FrameInput::new()
            .with_look(1.0, -0.5)
            .with_scroll(2.0)
            .with_key_pressed(KeyCode::R);
        input.movement = Vec2::new(0.0, 1.0);
        input.set_button(MouseButton::Left, true);

        input.clear();
        assert_eq!(input.look, Vec2::ZERO);
        assert_eq!(input.scroll, 0.0);
        assert!(input.keys_pressed().is_empty());
        assert!(!input.button_pressed(MouseButton::Left));
        assert_eq!(input.movement, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_press_and_release_same_frame() {
        let mut input = FrameInput::new();
        input.press_key(KeyCode::T);
        input.release_key(KeyCode::T);
        input.set_button(MouseButton::Right, false);

        assert!(input.keys_pressed().contains(&KeyCode::T));
        assert!(input.keys_released().contains(&KeyCode::T));
        assert!(input.button_released(MouseButton::Right));
        assert!(!input.button_pressed(MouseButton::Right));
    }
}
