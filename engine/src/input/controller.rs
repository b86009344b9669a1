//! Rig Controller
//!
//! Turns one [`FrameInput`] into calls on a [`CameraRig`]. Run it before
//! [`CameraRig::tick`] each frame.

use glam::{Vec2, Vec3};
use tracing::trace;

use super::{FrameInput, KeyBindings, MouseButton, RigAction};
use crate::camera::{CameraPose, CameraRig, StateKind};

/// Scroll deltas at or below this magnitude are ignored.
pub const SCROLL_DEAD_ZONE: f32 = 0.001;

#[derive(Debug, Clone)]
pub struct RigController {
    bindings: KeyBindings,
    scroll_dead_zone: f32,
    /// Holding the left button orbits; releasing returns to the prior state
    mouse_orbit: bool,
    /// State active when the current orbit drag began
    drag_origin: Option<StateKind>,
}

impl Default for RigController {
    fn default() -> Self {
        Self::new(KeyBindings::new())
    }
}

impl RigController {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            scroll_dead_zone: SCROLL_DEAD_ZONE,
            mouse_orbit: true,
            drag_origin: None,
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.bindings
    }

    pub fn set_scroll_dead_zone(&mut self, dead_zone: f32) {
        self.scroll_dead_zone = dead_zone.max(0.0);
    }

    pub fn set_mouse_orbit(&mut self, enabled: bool) {
        self.mouse_orbit = enabled;
    }

    /// Apply a frame of input to the rig. Returns the bound actions that
    /// fired, in the order they were applied.
    pub fn apply(&mut self, rig: &mut CameraRig, input: &FrameInput, dt: f32) -> Vec<RigAction> {
        if input.scroll.abs() > self.scroll_dead_zone {
            rig.increase_zoom_distance(input.scroll, dt);
        }
        if input.look != Vec2::ZERO {
            rig.increase_rotation(input.look.x, input.look.y, dt);
        }

        let mut fired = Vec::new();
        for key in input.keys_pressed() {
            if let Some(action) = self.bindings.get_action(*key)
                && !action.fires_on_release()
            {
                fired.push(action);
            }
        }
        for key in input.keys_released() {
            if let Some(action) = self.bindings.get_action(*key)
                && action.fires_on_release()
            {
                fired.push(action);
            }
        }
        // HashSet order is arbitrary; keep application deterministic
        fired.sort_by_key(|action| *action as u8);

        for &action in &fired {
            trace!(?action, "Rig action");
            apply_action(rig, action);
        }

        if self.mouse_orbit {
            if input.button_pressed(MouseButton::Left) && !rig.is_locked_on() {
                self.drag_origin = rig.current_state();
                rig.set_state(StateKind::Orbit);
            } else if input.button_released(MouseButton::Left) {
                let origin = self.drag_origin.take();
                if !rig.is_locked_on() {
                    rig.set_state(origin.unwrap_or(StateKind::Follow));
                }
            }
        }

        fired
    }
}

fn apply_action(rig: &mut CameraRig, action: RigAction) {
    match action {
        RigAction::ResetCamera => rig.reset_position_and_rotation(),
        RigAction::ToggleLockOn => rig.toggle_lock_on(),
        RigAction::CycleTargets => rig.cycle_targets(),
        RigAction::CycleLeft => rig.cycle_targets_left(),
        RigAction::CycleRight => rig.cycle_targets_right(),
        RigAction::FollowMode | RigAction::OrbitMode | RigAction::StationaryMode => {
            if let Some(kind) = action.state_kind() {
                rig.set_state(kind);
            }
        }
    }
}

/// Map stick input onto the ground plane of the camera's view: `vertical`
/// moves along the view direction, `horizontal` along camera right. The
/// result has no vertical component and is not normalized.
pub fn move_input_to_camera_space(pose: &CameraPose, horizontal: f32, vertical: f32) -> Vec3 {
    let right = pose.right();
    let forward = pose.forward();
    Vec3::new(
        horizontal * right.x + vertical * forward.x,
        0.0,
        horizontal * right.z + vertical * forward.z,
    )
}
