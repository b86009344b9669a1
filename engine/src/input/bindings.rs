//! Input Bindings Module
//!
//! Maps physical keys to camera rig actions, with rebinding support.

use std::collections::{HashMap, HashSet};

use super::KeyCode;
use crate::camera::StateKind;

/// Camera rig actions that can be bound to physical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RigAction {
    /// Re-center behind the target (default: R)
    ResetCamera,
    /// Lock onto the nearest target or release the lock (default: T)
    ToggleLockOn,
    /// Next target in range order (default: Space)
    CycleTargets,
    /// Nearest target to the left (default: Q)
    CycleLeft,
    /// Nearest target to the right (default: E)
    CycleRight,
    /// Switch to Follow (default: 1)
    FollowMode,
    /// Switch to Orbit (default: 2)
    OrbitMode,
    /// Switch to Stationary (default: 3)
    StationaryMode,
}

impl RigAction {
    /// Whether the action fires on key release rather than key press.
    pub fn fires_on_release(self) -> bool {
        matches!(self, RigAction::ToggleLockOn)
    }

    /// The camera state this action selects, if it is a mode switch.
    pub fn state_kind(self) -> Option<StateKind> {
        match self {
            RigAction::FollowMode => Some(StateKind::Follow),
            RigAction::OrbitMode => Some(StateKind::Orbit),
            RigAction::StationaryMode => Some(StateKind::Stationary),
            _ => None,
        }
    }
}

/// Maps physical keys to rig actions, one key per action.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    key_to_action: HashMap<KeyCode, RigAction>,
    /// Reverse lookup (for display)
    action_to_key: HashMap<RigAction, KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    /// Create a KeyBindings instance with default key mappings.
    ///
    /// Default bindings:
    /// - R = ResetCamera
    /// - T = ToggleLockOn
    /// - Space = CycleTargets
    /// - Q = CycleLeft
    /// - E = CycleRight
    /// - 1 / 2 / 3 = Follow / Orbit / Stationary
    pub fn new() -> Self {
        let mut bindings = Self::empty();

        bindings.bind(KeyCode::R, RigAction::ResetCamera);
        bindings.bind(KeyCode::T, RigAction::ToggleLockOn);
        bindings.bind(KeyCode::Space, RigAction::CycleTargets);
        bindings.bind(KeyCode::Q, RigAction::CycleLeft);
        bindings.bind(KeyCode::E, RigAction::CycleRight);
        bindings.bind(KeyCode::Digit1, RigAction::FollowMode);
        bindings.bind(KeyCode::Digit2, RigAction::OrbitMode);
        bindings.bind(KeyCode::Digit3, RigAction::StationaryMode);

        bindings
    }

    /// Bindings with nothing bound.
    pub fn empty() -> Self {
        Self {
            key_to_action: HashMap::new(),
            action_to_key: HashMap::new(),
        }
    }

    /// Bind a physical key to an action.
    ///
    /// Any previous binding of either the key or the action is removed.
    pub fn bind(&mut self, key: KeyCode, action: RigAction) {
        if let Some(old_action) = self.key_to_action.remove(&key) {
            self.action_to_key.remove(&old_action);
        }
        if let Some(old_key) = self.action_to_key.remove(&action) {
            self.key_to_action.remove(&old_key);
        }

        self.key_to_action.insert(key, action);
        self.action_to_key.insert(action, key);
    }

    pub fn unbind_key(&mut self, key: KeyCode) {
        if let Some(action) = self.key_to_action.remove(&key) {
            self.action_to_key.remove(&action);
        }
    }

    pub fn unbind_action(&mut self, action: RigAction) {
        if let Some(key) = self.action_to_key.remove(&action) {
            self.key_to_action.remove(&key);
        }
    }

    /// Get the action bound to a physical key, if any.
    pub fn get_action(&self, key: KeyCode) -> Option<RigAction> {
        self.key_to_action.get(&key).copied()
    }

    /// Get the key bound to an action, if any.
    pub fn get_key(&self, action: RigAction) -> Option<KeyCode> {
        self.action_to_key.get(&action).copied()
    }

    /// Check whether the key bound to `action` is in `keys`.
    pub fn is_action_in(&self, action: RigAction, keys: &HashSet<KeyCode>) -> bool {
        self.action_to_key
            .get(&action)
            .is_some_and(|key| keys.contains(key))
    }

    /// All current bindings as key-action pairs.
    pub fn all_bindings(&self) -> impl Iterator<Item = (KeyCode, RigAction)> + '_ {
        self.key_to_action.iter().map(|(&k, &a)| (k, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = KeyBindings::new();

        assert_eq!(bindings.get_action(KeyCode::R), Some(RigAction::ResetCamera));
        assert_eq!(bindings.get_action(KeyCode::T), Some(RigAction::ToggleLockOn));
        assert_eq!(bindings.get_action(KeyCode::Space), Some(RigAction::CycleTargets));
        assert_eq!(bindings.get_action(KeyCode::Q), Some(RigAction::CycleLeft));
        assert_eq!(bindings.get_action(KeyCode::E), Some(RigAction::CycleRight));
        assert_eq!(bindings.get_action(KeyCode::Digit2), Some(RigAction::OrbitMode));
        assert_eq!(bindings.get_action(KeyCode::W), None);
        assert_eq!(bindings.all_bindings().count(), 8);
    }

    #[test]
    fn test_rebind_key() {
        let mut bindings = KeyBindings::new();

        bindings.bind(KeyCode::U, RigAction::ToggleLockOn);

        assert_eq!(bindings.get_action(KeyCode::T), None);
        assert_eq!(bindings.get_action(KeyCode::U), Some(RigAction::ToggleLockOn));
        assert_eq!(bindings.get_key(RigAction::ToggleLockOn), Some(KeyCode::U));
    }

    #[test]
    fn test_bind_taken_key_steals_it() {
        let mut bindings = KeyBindings::new();

        // R now cycles; reset loses its key
        bindings.bind(KeyCode::R, RigAction::CycleTargets);
        assert_eq!(bindings.get_key(RigAction::ResetCamera), None);
        assert_eq!(bindings.get_action(KeyCode::Space), None);
        assert_eq!(bindings.get_action(KeyCode::R), Some(RigAction::CycleTargets));
    }

    #[test]
    fn test_is_action_in() {
        let bindings = KeyBindings::new();
        let pressed: HashSet<_> = [KeyCode::Q, KeyCode::W].into_iter().collect();

        assert!(bindings.is_action_in(RigAction::CycleLeft, &pressed));
        assert!(!bindings.is_action_in(RigAction::CycleRight, &pressed));
    }

    #[test]
    fn test_unbind() {
        let mut bindings = KeyBindings::new();

        bindings.unbind_key(KeyCode::R);
        assert_eq!(bindings.get_key(RigAction::ResetCamera), None);

        bindings.unbind_action(RigAction::CycleLeft);
        assert_eq!(bindings.get_action(KeyCode::Q), None);

        let pressed: HashSet<_> = [KeyCode::Q].into_iter().collect();
        assert!(!bindings.is_action_in(RigAction::CycleLeft, &pressed));
    }

    #[test]
    fn test_action_metadata() {
        assert!(RigAction::ToggleLockOn.fires_on_release());
        assert!(!RigAction::CycleTargets.fires_on_release());
        assert_eq!(RigAction::StationaryMode.state_kind(), Some(StateKind::Stationary));
        assert_eq!(RigAction::ResetCamera.state_kind(), None);
    }
}
