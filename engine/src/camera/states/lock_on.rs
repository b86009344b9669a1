//! Lock-on state: keep the followed target framed while aiming at the locked
//! target.

use glam::Vec3;
use tracing::debug;

use super::{
    CameraState, StateContext, StateKind, Transition, advance_distance, blend_rotation,
    chase_focal, place_camera,
};
use crate::camera::pose::{OrbitRotation, orbit_position};
use crate::math::{heading_degrees, look_rotation};

#[derive(Debug, Clone, Default)]
pub struct LockOnState;

impl LockOnState {
    pub fn new() -> Self {
        Self
    }
}

impl CameraState for LockOnState {
    fn kind(&self) -> StateKind {
        StateKind::LockOn
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        let focal = ctx.kinematics.focal_point.position();
        if let Some(lock) = ctx.lock.as_deref_mut() {
            let locked = lock.begin_target_lock(focal);
            debug!(locked, "Lock-on state entered");
        }
    }

    fn exit(&mut self, ctx: &mut StateContext<'_>) {
        if let Some(lock) = ctx.lock.as_deref_mut() {
            lock.end_target_lock();
        }
        debug!("Lock-on state exited");
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) -> Transition {
        let locked = ctx.lock.as_deref().is_some_and(|lock| lock.is_active());
        if locked {
            Transition::Stay
        } else {
            Transition::Resume
        }
    }

    fn late_update(&mut self, ctx: &mut StateContext<'_>) {
        chase_focal(ctx);

        let Some(aim) = ctx.lock.as_deref().and_then(|lock| lock.aim_override()) else {
            advance_distance(ctx);
            let look_at = ctx.default_look_at();
            place_camera(ctx, look_at);
            return;
        };

        // Swing around the pivot so the locked target sits beyond the followed one
        let weight = ctx.rotation_weight();
        let current = ctx.kinematics.rotation;
        let goal_yaw = heading_degrees(aim - ctx.pivot()).unwrap_or(current.yaw);
        let goal = OrbitRotation::new(goal_yaw, ctx.settings.clamp_pitch(ctx.settings.default_pitch));
        ctx.kinematics.rotation = blend_rotation(current, goal, weight);

        advance_distance(ctx);

        let rotation = ctx.kinematics.rotation.to_quat();
        let position = orbit_position(
            ctx.kinematics.focal_point.position(),
            rotation,
            ctx.settings.offset_distance,
            ctx.settings.offset_height,
            ctx.settings.lateral_offset,
        );
        let previous = ctx.kinematics.pose.rotation;
        let aimed = look_rotation(aim - position, Vec3::Y)
            .map(|goal| previous.slerp(goal, weight).normalize())
            .unwrap_or(previous);

        ctx.kinematics.pose.position = position;
        ctx.kinematics.pose.rotation = aimed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::pose::{FocalPoint, Kinematics, Transform};
    use crate::settings::CameraSettings;
    use crate::targeting::{LockOnTarget, TargetHandle, TargetLockManager, Targetable};

    #[test]
    fn test_resume_without_lock() {
        let mut settings = CameraSettings::default();
        let mut kinematics = Kinematics::default();
        let mut manager = TargetLockManager::new();
        let mut state = LockOnState::new();

        let mut ctx = StateContext::new(&mut settings, &mut kinematics, Transform::default())
            .with_lock(Some(&mut manager));
        state.enter(&mut ctx);
        assert_eq!(state.update(&mut ctx), Transition::Resume);
    }

    #[test]
    fn test_aims_at_locked_target() {
        let mut settings = CameraSettings::default();
        let mut kinematics = Kinematics {
            focal_point: FocalPoint::new(Vec3::ZERO),
            ..Default::default()
        };
        let mut manager = TargetLockManager::new();
        let enemy: TargetHandle = LockOnTarget::new(Vec3::new(8.0, 1.5, 0.0)).into_handle();
        manager.add_target_in_range(&enemy);
        let mut state = LockOnState::new();

        for frame in 0..600 {
            let mut ctx = StateContext::new(&mut settings, &mut kinematics, Transform::default())
                .with_dt(1.0 / 60.0)
                .with_lock(Some(&mut manager));
            if frame == 0 {
                state.enter(&mut ctx);
            }
            assert_eq!(state.update(&mut ctx), Transition::Stay);
            state.late_update(&mut ctx);
        }

        // Camera ends up on the far side of the pivot, looking at the enemy
        let pose = kinematics.pose;
        assert!((kinematics.rotation.yaw - 90.0).abs() < 0.5);
        let to_enemy = (enemy.look_at_position() - pose.position).normalize();
        assert!(pose.forward().dot(to_enemy) > 0.999);

        let mut ctx = StateContext::new(&mut settings, &mut kinematics, Transform::default())
            .with_lock(Some(&mut manager));
        state.exit(&mut ctx);
        assert!(!manager.is_active());
    }
}
