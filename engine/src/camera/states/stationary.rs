//! Stationary state: the camera stays where it is and turns to watch the
//! target.

use glam::Vec3;
use tracing::debug;

use super::{CameraState, StateContext, StateKind};
use crate::math::{heading_degrees, look_rotation, project_on_plane, wrap_yaw};

#[derive(Debug, Clone, Default)]
pub struct StationaryState;

impl StationaryState {
    pub fn new() -> Self {
        Self
    }
}

impl CameraState for StationaryState {
    fn kind(&self) -> StateKind {
        StateKind::Stationary
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        debug!(position = ?ctx.kinematics.pose.position, "Stationary state entered");
    }

    fn exit(&mut self, ctx: &mut StateContext<'_>) {
        // Hand the current view direction back to the rotation accumulator so
        // the next state starts from what is on screen
        if let Some(heading) = heading_degrees(ctx.kinematics.pose.forward()) {
            ctx.kinematics.rotation.yaw = wrap_yaw(heading);
        }
    }

    fn late_update(&mut self, ctx: &mut StateContext<'_>) {
        let pose = ctx.kinematics.pose;
        let relative =
            ctx.target_look_point() - pose.position + pose.right() * ctx.settings.lateral_offset;
        let flat = project_on_plane(relative, pose.up());

        if let Some(goal) = look_rotation(flat, Vec3::Y) {
            let weight = ctx.rotation_weight();
            ctx.kinematics.pose.rotation = pose.rotation.slerp(goal, weight).normalize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::pose::{CameraPose, Kinematics, Transform};
    use crate::settings::CameraSettings;
    use glam::Quat;

    #[test]
    fn test_turns_toward_target_without_moving() {
        let mut settings = CameraSettings::default();
        let start = Vec3::new(0.0, 1.5, 5.0);
        let mut kinematics = Kinematics {
            pose: CameraPose::new(start, Quat::IDENTITY),
            ..Default::default()
        };
        // Target off to the right of the camera's view
        let target = Transform::from_position(Vec3::new(5.0, 0.0, 5.0));
        let mut state = StationaryState::new();

        for _ in 0..240 {
            let mut ctx = StateContext::new(&mut settings, &mut kinematics, target).with_dt(1.0 / 60.0);
            state.late_update(&mut ctx);
        }

        assert_eq!(kinematics.pose.position, start);
        let forward = kinematics.pose.forward();
        assert!((forward - Vec3::X).length() < 1e-2, "{forward:?}");
    }

    #[test]
    fn test_exit_syncs_yaw() {
        let mut settings = CameraSettings::default();
        let mut kinematics = Kinematics {
            pose: CameraPose::new(Vec3::ZERO, Quat::from_rotation_y(-90f32.to_radians())),
            ..Default::default()
        };
        let mut state = StationaryState::new();
        let mut ctx = StateContext::new(&mut settings, &mut kinematics, Transform::default());
        state.exit(&mut ctx);
        assert!((kinematics.rotation.yaw - 90.0).abs() < 1e-3);
    }
}
