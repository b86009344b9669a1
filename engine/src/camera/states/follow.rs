//! Follow state: swing back behind the target and trail it.

use glam::Vec2;
use tracing::debug;

use super::{
    CameraState, StateContext, StateKind, advance_distance, apply_look, blend_rotation,
    chase_focal, place_camera, rotation_gap,
};
use crate::camera::pose::OrbitRotation;
use crate::math::wrap_yaw;
use crate::settings::CameraSettings;

/// Trails the target and damps the rotation toward a resting rotation
/// relative to the target's heading.
#[derive(Debug, Clone)]
pub struct FollowState {
    /// Resting rotation relative to the target heading
    default_rotation: OrbitRotation,
}

impl FollowState {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            default_rotation: Self::resting(settings),
        }
    }

    fn resting(settings: &CameraSettings) -> OrbitRotation {
        OrbitRotation::new(
            settings.default_yaw_offset,
            settings.clamp_pitch(settings.default_pitch),
        )
    }

    pub fn default_rotation(&self) -> OrbitRotation {
        self.default_rotation
    }

    /// Rotation directly behind the target this frame.
    fn goal(&self, ctx: &StateContext<'_>) -> OrbitRotation {
        OrbitRotation::new(
            wrap_yaw(ctx.target.heading() + self.default_rotation.yaw),
            self.default_rotation.pitch,
        )
    }
}

impl CameraState for FollowState {
    fn kind(&self) -> StateKind {
        StateKind::Follow
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        self.default_rotation = Self::resting(ctx.settings);
        debug!(
            yaw_offset = self.default_rotation.yaw,
            pitch = self.default_rotation.pitch,
            "Follow state entered"
        );
    }

    fn late_update(&mut self, ctx: &mut StateContext<'_>) {
        if !ctx.settings.follow_enabled {
            return;
        }

        chase_focal(ctx);

        if ctx.settings.snap_behind_target {
            let current = ctx.kinematics.rotation;
            let goal = self.goal(ctx);
            let gap = rotation_gap(current, goal);

            ctx.kinematics.rotation = if gap <= ctx.settings.snap_angle {
                goal
            } else {
                // Turn faster the further off we are
                let ease = ctx.settings.ease_curve.evaluate(gap / 180.0);
                blend_rotation(current, goal, ctx.rotation_weight() * ease)
            };
        }

        advance_distance(ctx);
        let look_at = ctx.default_look_at();
        place_camera(ctx, look_at);
    }

    fn handle_input(&mut self, ctx: &mut StateContext<'_>, look: Vec2) {
        if ctx.settings.follow_enabled {
            apply_look(ctx, look);
        }
    }
}
