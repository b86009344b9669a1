//! Keyboard Input Module
//!
//! Key identifiers and held-key tracking for the keys the camera rig and the
//! demo driver care about. Decoupled from any windowing system.

/// Keyboard key codes, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    // Movement keys
    W,
    A,
    S,
    D,

    // Camera keys
    Q,
    E,
    R,
    T,
    U,
    Space,

    // State selection
    Digit1,
    Digit2,
    Digit3,
    Digit4,

    // Arrow keys (alternate movement)
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Modifiers and control keys
    ShiftLeft,
    ShiftRight,
    Escape,

    /// Catch-all for unhandled keys
    Unknown,
}

/// Tracks which movement keys are held so the driver can produce a stick-like
/// horizontal/vertical axis pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementKeys {
    /// W / ArrowUp
    pub forward: bool,
    /// S / ArrowDown
    pub backward: bool,
    /// A / ArrowLeft
    pub left: bool,
    /// D / ArrowRight
    pub right: bool,
}

impl MovementKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update movement state based on key press/release.
    ///
    /// Returns `true` if the key was a movement key and was handled.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::W | KeyCode::ArrowUp => self.forward = pressed,
            KeyCode::S | KeyCode::ArrowDown => self.backward = pressed,
            KeyCode::A | KeyCode::ArrowLeft => self.left = pressed,
            KeyCode::D | KeyCode::ArrowRight => self.right = pressed,
            _ => return false,
        }
        true
    }

    pub fn any_pressed(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Reset all movement keys to released state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Forward/backward axis (-1, 0, or 1).
    pub fn vertical_axis(&self) -> f32 {
        (self.forward as i32 - self.backward as i32) as f32
    }

    /// Left/right axis (-1, 0, or 1).
    pub fn horizontal_axis(&self) -> f32 {
        (self.right as i32 - self.left as i32) as f32
    }
}
