//! Orbit state: free rotation around the target driven by look input.

use glam::Vec2;
use tracing::debug;

use super::{
    CameraState, StateContext, StateKind, advance_distance, apply_look, chase_focal, place_camera,
};

#[derive(Debug, Clone, Default)]
pub struct OrbitState;

impl OrbitState {
    pub fn new() -> Self {
        Self
    }
}

impl CameraState for OrbitState {
    fn kind(&self) -> StateKind {
        StateKind::Orbit
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        debug!(
            yaw = ctx.kinematics.rotation.yaw,
            pitch = ctx.kinematics.rotation.pitch,
            "Orbit state entered"
        );
    }

    fn late_update(&mut self, ctx: &mut StateContext<'_>) {
        chase_focal(ctx);
        advance_distance(ctx);
        let look_at = ctx.default_look_at();
        place_camera(ctx, look_at);
    }

    fn handle_input(&mut self, ctx: &mut StateContext<'_>, look: Vec2) {
        apply_look(ctx, look);
    }
}
