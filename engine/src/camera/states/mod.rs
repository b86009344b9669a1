//! Camera States
//!
//! Each state decides how the camera turns; all of them place it with the
//! same offset formula ([`place_camera`]). States work on a borrowed
//! [`StateContext`] built by the rig for every call.

pub mod follow;
pub mod lock_on;
pub mod orbit;
pub mod stationary;

pub use follow::FollowState;
pub use lock_on::LockOnState;
pub use orbit::OrbitState;
pub use stationary::StationaryState;

use std::fmt;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::occlusion::OcclusionState;
use super::pose::{CameraPose, Kinematics, OrbitRotation, Transform, orbit_position};
use crate::math::{delta_angle, look_rotation, move_towards, wrap_yaw};
use crate::settings::CameraSettings;
use crate::targeting::TargetLockManager;

/// Which behavior drives the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    Follow,
    Orbit,
    Stationary,
    LockOn,
}

impl StateKind {
    pub const ALL: [StateKind; 4] = [
        StateKind::Follow,
        StateKind::Orbit,
        StateKind::Stationary,
        StateKind::LockOn,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StateKind::Follow => "follow",
            StateKind::Orbit => "orbit",
            StateKind::Stationary => "stationary",
            StateKind::LockOn => "lock_on",
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a state asks the rig to do after its update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    #[default]
    Stay,
    /// Switch to another state
    Switch(StateKind),
    /// Go back to the state that was active before this one
    Resume,
}

/// Borrowed view of the rig handed to states.
pub struct StateContext<'a> {
    pub settings: &'a mut CameraSettings,
    pub kinematics: &'a mut Kinematics,
    /// Followed target this frame
    pub target: Transform,
    /// Occlusion result, `None` while collision is disabled
    pub occlusion: Option<OcclusionState>,
    /// Lock manager, `None` while targeting is disabled
    pub lock: Option<&'a mut TargetLockManager>,
    /// Frame time in seconds
    pub dt: f32,
}

impl<'a> StateContext<'a> {
    pub fn new(
        settings: &'a mut CameraSettings,
        kinematics: &'a mut Kinematics,
        target: Transform,
    ) -> Self {
        Self {
            settings,
            kinematics,
            target,
            occlusion: None,
            lock: None,
            dt: 0.0,
        }
    }

    pub fn with_dt(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_occlusion(mut self, occlusion: Option<OcclusionState>) -> Self {
        self.occlusion = occlusion;
        self
    }

    pub fn with_lock(mut self, lock: Option<&'a mut TargetLockManager>) -> Self {
        self.lock = lock;
        self
    }

    /// Followed target's look point.
    pub fn target_look_point(&self) -> Vec3 {
        self.target.position + Vec3::Y * self.settings.offset_height
    }

    /// Point the camera orbits: the focal point raised by the look height.
    pub fn pivot(&self) -> Vec3 {
        self.kinematics.focal_point.position() + Vec3::Y * self.settings.offset_height
    }

    /// Aim point when nothing overrides it: the target's look point, shifted
    /// with the camera so the view stays parallel.
    pub fn default_look_at(&self) -> Vec3 {
        let right = self.kinematics.rotation.to_quat() * Vec3::X;
        self.target_look_point() + right * self.settings.lateral_offset
    }

    /// Rotation speed scaled blend weight for this frame.
    pub fn rotation_weight(&self) -> f32 {
        (self.settings.rotate_speed * self.dt).clamp(0.0, 1.0)
    }
}

/// One camera behavior.
///
/// `enter` runs when the state becomes active, `exit` when it stops being
/// active. `update` runs in the update phase, `late_update` in the pose phase.
pub trait CameraState {
    fn kind(&self) -> StateKind;

    fn enter(&mut self, _ctx: &mut StateContext<'_>) {}

    fn exit(&mut self, _ctx: &mut StateContext<'_>) {}

    fn update(&mut self, _ctx: &mut StateContext<'_>) -> Transition {
        Transition::Stay
    }

    fn late_update(&mut self, ctx: &mut StateContext<'_>);

    /// Look input: x = horizontal, y = vertical (positive = up).
    fn handle_input(&mut self, _ctx: &mut StateContext<'_>, _look: Vec2) {}
}

/// Build the stock state for a kind.
pub fn create_state(kind: StateKind, settings: &CameraSettings) -> Box<dyn CameraState> {
    match kind {
        StateKind::Follow => Box::new(FollowState::new(settings)),
        StateKind::Orbit => Box::new(OrbitState::new()),
        StateKind::Stationary => Box::new(StationaryState::new()),
        StateKind::LockOn => Box::new(LockOnState::new()),
    }
}

// ============================================================================
// Shared motion helpers
// ============================================================================

/// Move the focal point toward the target for this frame.
pub fn chase_focal(ctx: &mut StateContext<'_>) {
    let target = ctx.target.position;
    ctx.kinematics
        .focal_point
        .follow(target, ctx.settings, ctx.dt);
}

/// Step the applied distance toward the desired distance.
///
/// Pulling in for an obstruction uses `zoom_speed`; recovering uses
/// `reset_speed`. Without collision every change uses `zoom_speed`.
pub fn advance_distance(ctx: &mut StateContext<'_>) {
    let speed = match ctx.occlusion {
        Some(state) if !state.is_occluded => ctx.settings.reset_speed,
        _ => ctx.settings.zoom_speed,
    };
    ctx.settings.offset_distance = move_towards(
        ctx.settings.offset_distance,
        ctx.settings.desired_distance,
        speed * ctx.dt,
    );
}

/// Place the camera with the offset formula and aim it at `look_at`.
pub fn place_camera(ctx: &mut StateContext<'_>, look_at: Vec3) {
    let rotation = ctx.kinematics.rotation.to_quat();
    let position = orbit_position(
        ctx.kinematics.focal_point.position(),
        rotation,
        ctx.settings.offset_distance,
        ctx.settings.offset_height,
        ctx.settings.lateral_offset,
    );
    let orientation = look_rotation(look_at - position, Vec3::Y).unwrap_or(rotation);
    ctx.kinematics.pose = CameraPose::new(position, orientation);
}

/// Apply look input to the rotation accumulator.
pub fn apply_look(ctx: &mut StateContext<'_>, look: Vec2) {
    let scale = ctx.settings.rotate_speed * ctx.dt;
    let vertical = if ctx.settings.invert_y { look.y } else { -look.y };
    let range = ctx.settings.vertical_rotation;
    ctx.kinematics
        .rotation
        .add(look.x * scale, vertical * scale, range);
}

/// Blend `current` toward `goal` by `weight` along the shortest yaw arc.
pub fn blend_rotation(current: OrbitRotation, goal: OrbitRotation, weight: f32) -> OrbitRotation {
    let weight = weight.clamp(0.0, 1.0);
    OrbitRotation {
        yaw: wrap_yaw(current.yaw + delta_angle(current.yaw, goal.yaw) * weight),
        pitch: current.pitch + (goal.pitch - current.pitch) * weight,
    }
}

/// Angular gap between two rotations in degrees.
pub fn rotation_gap(current: OrbitRotation, goal: OrbitRotation) -> f32 {
    let yaw = delta_angle(current.yaw, goal.yaw);
    let pitch = goal.pitch - current.pitch;
    (yaw * yaw + pitch * pitch).sqrt()
}
