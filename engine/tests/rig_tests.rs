//! Rig Tests - End-to-end Frames
//!
//! Builds a full `CameraRig` over a `BoxScene` and steps it frame by frame the
//! way a game loop would: move the target, `tick`, `late_tick`, read the pose.

use std::rc::Rc;

use glam::Vec3;
use tailcam_engine::camera::{
    CameraRig, OrbitRotation, StateKind, TrackedTransform, Transform, orbit_position,
};
use tailcam_engine::error::RigError;
use tailcam_engine::query::{BoxScene, LayerMask};
use tailcam_engine::settings::{CameraSettings, SettingsOverride};
use tailcam_engine::targeting::{LockOnTarget, RangeNotifier, RangeSensor, Targetable};

const DT: f32 = 1.0 / 60.0;

struct Harness {
    player: Rc<TrackedTransform>,
    scene: Rc<BoxScene>,
    rig: CameraRig,
}

impl Harness {
    fn new(settings: CameraSettings) -> Self {
        Self::with_notifier(settings, None)
    }

    fn with_notifier(settings: CameraSettings, notifier: Option<Rc<RangeNotifier>>) -> Self {
        let player = Rc::new(TrackedTransform::new(Transform::default()));
        let scene = Rc::new(BoxScene::new());
        let mut builder = CameraRig::builder(settings)
            .target(player.clone())
            .geometry_query(scene.clone());
        if let Some(notifier) = notifier {
            builder = builder.range_notifier(notifier);
        }
        let rig = builder.build().unwrap();
        Self { player, scene, rig }
    }

    fn step(&mut self, frames: u32) {
        for _ in 0..frames {
            self.rig.tick(DT);
            self.rig.late_tick(DT);
        }
    }
}

fn collision_off() -> CameraSettings {
    CameraSettings {
        enable_collision: false,
        ..Default::default()
    }
}

// ============================================================================
// Follow
// ============================================================================

#[test]
fn test_straight_line_follow_matches_offset_formula() {
    let settings = CameraSettings {
        snap_factor: 1.0,
        ..collision_off()
    };
    let mut h = Harness::new(settings);

    let heading = 0.0;
    let mut position = Vec3::ZERO;
    for _ in 0..100 {
        position += Vec3::new(0.0, 0.0, -4.0) * DT;
        h.player.set(Transform::with_heading(position, heading));
        h.step(1);
    }

    assert_eq!(h.rig.current_state(), Some(StateKind::Follow));
    assert_eq!(h.rig.distance(), 4.5);

    let expected = orbit_position(
        position,
        OrbitRotation::new(heading, 15.0).to_quat(),
        4.5,
        1.5,
        0.0,
    );
    let pose = h.rig.pose();
    assert!((pose.position - expected).length() < 1e-3, "{:?}", pose.position);

    // Looking at the target's look point
    let to_target = (position + Vec3::Y * 1.5 - pose.position).normalize();
    assert!(pose.forward().dot(to_target) > 0.9999);
}

#[test]
fn test_follow_swings_behind_turned_target() {
    let settings = CameraSettings {
        snap_factor: 1.0,
        ..collision_off()
    };
    let mut h = Harness::new(settings);

    // Target turns to face +X and walks that way
    let mut position = Vec3::ZERO;
    for _ in 0..240 {
        position += Vec3::X * 3.0 * DT;
        h.player.set(Transform::with_heading(position, 90.0));
        h.step(1);
    }

    let rotation = h.rig.rotation();
    assert!((rotation.yaw - 90.0).abs() < 1e-3);
    assert!((rotation.pitch - 15.0).abs() < 1e-3);
    assert!(h.rig.pose().position.x < position.x);
}

#[test]
fn test_focal_lag_is_bounded() {
    let mut h = Harness::new(collision_off());
    let max_lag = h.rig.settings().max_lag_distance;

    let mut position = Vec3::ZERO;
    for _ in 0..300 {
        position += Vec3::new(0.0, 0.0, -9.0) * DT;
        h.player.set_position(position);
        h.step(1);
        assert!(h.rig.focal_point().distance(position) <= max_lag + 1e-3);
    }
}

// ============================================================================
// Zoom
// ============================================================================

#[test]
fn test_zoom_is_clamped_to_range() {
    let mut h = Harness::new(collision_off());

    h.rig.set_zoom_distance(100.0);
    assert_eq!(h.rig.settings().zoom_distance, 15.0);
    h.step(120);
    assert_eq!(h.rig.distance(), 15.0);

    h.rig.increase_zoom_distance(-1000.0, 1.0);
    assert_eq!(h.rig.settings().zoom_distance, 1.0);
    h.step(120);
    // Never closer than the base distance
    assert_eq!(h.rig.distance(), 2.0);
}

#[test]
fn test_zoom_disabled_ignores_requests() {
    let mut h = Harness::new(collision_off());
    h.rig.set_zoom_enabled(false);
    h.rig.set_zoom_distance(9.0);
    h.step(60);
    assert_eq!(h.rig.distance(), 4.5);
}

// ============================================================================
// Collision
// ============================================================================

fn wall_behind(scene: &BoxScene) {
    scene.insert_box(Vec3::new(-10.0, -10.0, 2.0), Vec3::new(10.0, 10.0, 2.5));
}

#[test]
fn test_wall_pulls_in_and_view_recovers() {
    let mut h = Harness::new(CameraSettings::default());
    h.step(10);
    assert!(!h.rig.is_occluded());

    wall_behind(&h.scene);
    h.step(60);
    assert!(h.rig.is_occluded());
    assert!(h.rig.distance() < 2.1);
    let state = h.rig.occlusion_state().unwrap();
    assert_eq!(state.reset_distance, 4.5);

    h.scene.clear();
    h.step(1);
    assert!(!h.rig.is_occluded());
    h.step(120);
    assert_eq!(h.rig.distance(), 4.5);
}

#[test]
fn test_disabling_collision_while_occluded_restores_distance() {
    let mut h = Harness::new(CameraSettings::default());
    wall_behind(&h.scene);
    h.step(60);
    assert!(h.rig.is_occluded());

    h.rig.set_collision_enabled(false);
    assert!(!h.rig.is_occluded());
    assert!(h.rig.occlusion_state().is_none());
    assert_eq!(h.rig.settings().desired_distance, 4.5);

    // The wall is still there, but nothing checks it anymore
    h.step(60);
    assert_eq!(h.rig.distance(), 4.5);
}

#[test]
fn test_query_outage_keeps_camera_running() {
    let mut h = Harness::new(CameraSettings::default());
    h.scene.set_available(false);
    h.step(30);
    assert!(!h.rig.is_occluded());
    assert_eq!(h.rig.distance(), 4.5);
}

// ============================================================================
// Lock-on
// ============================================================================

#[test]
fn test_lock_on_and_resume_when_target_leaves() {
    let notifier = Rc::new(RangeNotifier::new());
    let mut h = Harness::with_notifier(collision_off(), Some(notifier.clone()));
    let enemy = LockOnTarget::new(Vec3::new(6.0, 0.0, -6.0)).into_handle();

    h.rig.set_state(StateKind::Orbit);
    notifier.notify_entered(&enemy);
    h.step(1);

    h.rig.toggle_lock_on();
    assert_eq!(h.rig.current_state(), Some(StateKind::LockOn));
    assert!(h.rig.is_locked_on());
    assert!(enemy.is_active());
    assert_eq!(h.rig.snapshot().lock_target, Some(enemy.look_at_position()));
    assert!(h.rig.reticle().visible);

    h.step(240);
    let pose = h.rig.pose();
    let to_enemy = (enemy.look_at_position() - pose.position).normalize();
    assert!(pose.forward().dot(to_enemy) > 0.99);

    notifier.notify_exited(&enemy);
    h.step(1);
    assert!(!h.rig.is_locked_on());
    assert!(!enemy.is_active());
    assert_eq!(h.rig.current_state(), Some(StateKind::Orbit));
}

#[test]
fn test_toggle_twice_releases_lock() {
    let notifier = Rc::new(RangeNotifier::new());
    let mut h = Harness::with_notifier(collision_off(), Some(notifier.clone()));
    let enemy = LockOnTarget::new(Vec3::new(0.0, 0.0, -5.0)).into_handle();
    notifier.notify_entered(&enemy);
    h.step(1);

    h.rig.toggle_lock_on();
    assert!(h.rig.is_locked_on());
    h.rig.toggle_lock_on();
    assert!(!h.rig.is_locked_on());
    assert_eq!(h.rig.current_state(), Some(StateKind::Follow));
}

#[test]
fn test_disabling_targeting_leaves_lock_on() {
    let notifier = Rc::new(RangeNotifier::new());
    let mut h = Harness::with_notifier(collision_off(), Some(notifier.clone()));
    let enemy = LockOnTarget::new(Vec3::new(0.0, 0.0, -5.0)).into_handle();
    notifier.notify_entered(&enemy);
    h.step(1);
    h.rig.toggle_lock_on();
    assert_eq!(notifier.subscriber_count(), 1);

    h.rig.set_targeting_enabled(false);
    assert_eq!(h.rig.current_state(), Some(StateKind::Follow));
    assert!(!enemy.is_active());
    assert_eq!(notifier.subscriber_count(), 0);

    h.rig.set_targeting_enabled(true);
    assert_eq!(notifier.subscriber_count(), 1);
}

#[test]
fn test_reenabled_targeting_sees_targets_already_in_range() {
    let player = Rc::new(TrackedTransform::new(Transform::default()));
    let scene = Rc::new(BoxScene::new());
    let collider = scene.insert_box(Vec3::new(-0.5, 0.0, -5.5), Vec3::new(0.5, 2.0, -4.5));
    let enemy = LockOnTarget::new(Vec3::new(0.0, 0.0, -5.0))
        .with_collider(collider)
        .into_handle();
    let mut sensor = RangeSensor::new(12.0, LayerMask::ALL);
    sensor.register(&enemy);

    let mut rig = CameraRig::builder(collision_off())
        .target(player)
        .geometry_query(scene.clone())
        .range_sensor(sensor)
        .build()
        .unwrap();
    rig.tick(DT);
    rig.late_tick(DT);
    assert_eq!(rig.lock_manager().unwrap().target_count(), 1);

    rig.set_targeting_enabled(false);
    rig.tick(DT);
    rig.late_tick(DT);
    rig.set_targeting_enabled(true);
    for _ in 0..10 {
        rig.tick(DT);
        rig.late_tick(DT);
    }

    // The enemy never left the sphere
    assert_eq!(rig.lock_manager().unwrap().target_count(), 1);
    rig.toggle_lock_on();
    assert!(rig.is_locked_on());
    assert!(enemy.is_active());
    assert_eq!(rig.current_state(), Some(StateKind::LockOn));
}

// ============================================================================
// Settings and Reset
// ============================================================================

#[test]
fn test_invalid_settings_fail_build() {
    let settings = CameraSettings {
        snap_factor: 2.0,
        ..Default::default()
    };
    let player = Rc::new(TrackedTransform::new(Transform::default()));
    let err = CameraRig::builder(settings)
        .target(player)
        .geometry_query(Rc::new(BoxScene::new()))
        .build()
        .unwrap_err();
    assert!(matches!(err, RigError::InvalidSettings { field: "snap_factor", .. }));
}

#[test]
fn test_override_then_reset() {
    let mut h = Harness::new(collision_off());
    let patch = SettingsOverride::from_json(r#"{ "offset_height": 2.5, "lateral_offset": 0.75 }"#)
        .unwrap();
    h.rig.apply_settings_override(&patch).unwrap();
    assert_eq!(h.rig.settings().offset_height, 2.5);
    assert_eq!(h.rig.settings().lateral_offset, 0.75);

    h.rig.set_zoom_distance(10.0);
    h.rig.reset_settings();
    assert_eq!(h.rig.settings().offset_height, 1.5);
    assert_eq!(h.rig.settings().lateral_offset, 0.0);
    assert_eq!(h.rig.settings().zoom_distance, 4.5);
}

#[test]
fn test_reset_restores_values_given_at_build() {
    let settings = CameraSettings {
        offset_height: 2.0,
        default_distance: 6.0,
        ..collision_off()
    };
    let mut h = Harness::new(settings);
    let patch = SettingsOverride::from_json(r#"{ "offset_height": 3.0 }"#).unwrap();
    h.rig.apply_settings_override(&patch).unwrap();
    h.rig.set_zoom_distance(12.0);

    h.rig.reset_settings();
    assert_eq!(h.rig.settings().offset_height, 2.0);
    assert_eq!(h.rig.settings().zoom_distance, 6.0);
    assert_eq!(h.rig.settings().desired_distance, 6.0);
}

#[test]
fn test_reset_recenters_on_target() {
    let mut h = Harness::new(collision_off());
    h.rig.set_state(StateKind::Orbit);
    h.rig.increase_rotation(20.0, 0.0, 0.1);
    h.player.set_position(Vec3::new(3.0, 0.0, 3.0));

    h.rig.reset_position_and_rotation();
    assert_eq!(h.rig.focal_point(), Vec3::new(3.0, 0.0, 3.0));
    assert_eq!(h.rig.rotation(), OrbitRotation::default());
    assert_eq!(h.rig.distance(), 4.5);
}

#[test]
fn test_snapshot_serializes() {
    let mut h = Harness::new(collision_off());
    h.step(1);
    let json = serde_json::to_value(h.rig.snapshot()).unwrap();
    assert_eq!(json["state"], "follow");
    assert_eq!(json["is_occluded"], false);
    assert!(json["lock_target"].is_null());
}
