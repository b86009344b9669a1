//! Pose primitives
//!
//! The followed target's transform, the camera pose, the lagged focal point,
//! the (yaw, pitch) accumulator, and the offset formula every state uses to
//! place the camera.

use std::cell::Cell;

use glam::{Quat, Vec3};

use crate::math::{FloatRange, forward_of, heading_degrees, move_towards_vec3, wrap_yaw};
use crate::query::ColliderId;
use crate::settings::CameraSettings;

/// Below this gap the focal point lands exactly on the target.
const FOCAL_SNAP_DISTANCE: f32 = 0.01;

/// World position + orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Upright transform facing `heading` degrees (0 = -Z, 90 = +X).
    pub fn with_heading(position: Vec3, heading: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(-heading.to_radians()),
        }
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        forward_of(self.rotation)
    }

    /// Ground-plane heading in degrees; 0 when facing straight up or down.
    pub fn heading(&self) -> f32 {
        heading_degrees(self.forward()).unwrap_or(0.0)
    }
}

/// The object the camera follows.
///
/// The world owns it; the rig reads it every frame.
pub trait FollowTarget {
    /// Current transform, or `None` once the object has been destroyed.
    fn transform(&self) -> Option<Transform>;

    /// Root collider of the target's own hierarchy. Occlusion ignores hits on
    /// it.
    fn collider_root(&self) -> Option<ColliderId> {
        None
    }
}

/// A [`FollowTarget`] the driver moves by hand.
#[derive(Debug, Default)]
pub struct TrackedTransform {
    transform: Cell<Option<Transform>>,
    collider_root: Option<ColliderId>,
}

impl TrackedTransform {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform: Cell::new(Some(transform)),
            collider_root: None,
        }
    }

    pub fn with_collider_root(mut self, root: ColliderId) -> Self {
        self.collider_root = Some(root);
        self
    }

    pub fn set(&self, transform: Transform) {
        self.transform.set(Some(transform));
    }

    /// Move the target, keeping its rotation. Ignored once destroyed.
    pub fn set_position(&self, position: Vec3) {
        if let Some(mut transform) = self.transform.get() {
            transform.position = position;
            self.transform.set(Some(transform));
        }
    }

    /// Turn the target, keeping its position. Ignored once destroyed.
    pub fn set_rotation(&self, rotation: Quat) {
        if let Some(mut transform) = self.transform.get() {
            transform.rotation = rotation;
            self.transform.set(Some(transform));
        }
    }

    /// Mark the target destroyed; the rig holds still from then on.
    pub fn destroy(&self) {
        self.transform.set(None);
    }

    pub fn is_destroyed(&self) -> bool {
        self.transform.get().is_none()
    }
}

impl FollowTarget for TrackedTransform {
    fn transform(&self) -> Option<Transform> {
        self.transform.get()
    }

    fn collider_root(&self) -> Option<ColliderId> {
        self.collider_root
    }
}

/// Final camera placement for a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl CameraPose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// View direction (local -Z).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        forward_of(self.rotation)
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

/// (yaw, pitch) in degrees.
///
/// Positive yaw turns the view right (same convention as
/// [`Transform::heading`]); positive pitch raises the camera above the focal
/// point so it looks down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrbitRotation {
    pub yaw: f32,
    pub pitch: f32,
}

impl OrbitRotation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    /// Yaw applied first, then pitch about the yawed right axis.
    pub fn to_quat(self) -> Quat {
        Quat::from_rotation_y(-self.yaw.to_radians()) * Quat::from_rotation_x(-self.pitch.to_radians())
    }

    /// Accumulate deltas; yaw wraps into [-360, 360] and pitch is clamped.
    pub fn add(&mut self, yaw_delta: f32, pitch_delta: f32, pitch_range: FloatRange) {
        self.yaw = wrap_yaw(self.yaw + yaw_delta);
        self.pitch = pitch_range.clamp(self.pitch + pitch_delta);
    }
}

/// Where the camera sits for a given focal point, rotation and distance.
///
/// `focal + up * height + rotation * (+Z * distance) + right * lateral`: the
/// camera looks down its local -Z, so +Z places it behind the look point.
pub fn orbit_position(
    focal: Vec3,
    rotation: Quat,
    distance: f32,
    height: f32,
    lateral: f32,
) -> Vec3 {
    focal + Vec3::Y * height + rotation * (Vec3::Z * distance) + rotation * (Vec3::X * lateral)
}

/// Point the camera lags behind while chasing the target.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FocalPoint {
    position: Vec3,
}

impl FocalPoint {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn snap_to(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Chase `target` for one frame.
    ///
    /// Closing speed is `move_speed` scaled by the ease curve over the gap
    /// normalized by `max_lag_distance`; `snap_factor` blends the remaining
    /// gap in on top. The result is then held within `max_lag_distance` of
    /// the target.
    pub fn follow(&mut self, target: Vec3, settings: &CameraSettings, dt: f32) -> Vec3 {
        let gap = self.position.distance(target);
        if gap <= FOCAL_SNAP_DISTANCE || settings.snap_factor >= 1.0 {
            self.position = target;
            return self.position;
        }

        let max_lag = settings.max_lag_distance.max(f32::EPSILON);
        let ease = settings.ease_curve.evaluate(gap / max_lag);
        let step = settings.move_speed * ease * dt.max(0.0);
        let step = step + (gap - step).max(0.0) * settings.snap_factor;
        self.position = move_towards_vec3(self.position, target, step);

        let offset = self.position - target;
        if offset.length() > settings.max_lag_distance {
            self.position = target + offset.normalize_or_zero() * settings.max_lag_distance;
        }
        self.position
    }
}

/// Mutable camera motion state shared by all camera states.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Kinematics {
    pub focal_point: FocalPoint,
    pub rotation: OrbitRotation,
    pub pose: CameraPose,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_rotation_conventions() {
        let behind = OrbitRotation::new(0.0, 0.0).to_quat();
        let pos = orbit_position(Vec3::ZERO, behind, 4.0, 0.0, 0.0);
        assert!((pos - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-5);

        // Positive pitch lifts the camera
        let above = OrbitRotation::new(0.0, 30.0).to_quat();
        assert!(orbit_position(Vec3::ZERO, above, 4.0, 0.0, 0.0).y > 0.0);

        // Yaw 90 faces +X, so the camera sits on -X
        let right = OrbitRotation::new(90.0, 0.0).to_quat();
        let pos = orbit_position(Vec3::ZERO, right, 4.0, 0.0, 0.0);
        assert!((pos - Vec3::new(-4.0, 0.0, 0.0)).length() < 1e-4);
        assert!((heading_degrees(forward_of(right)).unwrap() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_yaw_then_pitch_order() {
        let r = OrbitRotation::new(90.0, 30.0);
        let yaw_first = Quat::from_rotation_y(-90f32.to_radians()) * Quat::from_rotation_x(-30f32.to_radians());
        let pitch_first = Quat::from_rotation_x(-30f32.to_radians()) * Quat::from_rotation_y(-90f32.to_radians());
        assert!(r.to_quat().abs_diff_eq(yaw_first, 1e-6));
        assert!(!r.to_quat().abs_diff_eq(pitch_first, 1e-3));
    }

    #[test]
    fn test_rotation_add_wraps_and_clamps() {
        let mut r = OrbitRotation::new(350.0, 0.0);
        r.add(20.0, 200.0, FloatRange::new(-30.0, 70.0));
        assert!((r.yaw - 10.0).abs() < 1e-4);
        assert_eq!(r.pitch, 70.0);
    }

    #[test]
    fn test_lateral_offset_moves_right() {
        let rot = OrbitRotation::new(0.0, 0.0).to_quat();
        let pos = orbit_position(Vec3::ZERO, rot, 4.0, 1.5, 1.0);
        assert!((pos - Vec3::new(1.0, 1.5, 4.0)).length() < 1e-5);
    }

    #[test]
    fn test_focal_point_respects_leash() {
        let settings = CameraSettings {
            max_lag_distance: 1.0,
            move_speed: 0.5,
            ..Default::default()
        };
        let mut focal = FocalPoint::new(Vec3::ZERO);
        focal.follow(Vec3::new(10.0, 0.0, 0.0), &settings, 1.0 / 60.0);
        assert!((focal.position() - Vec3::new(9.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_focal_point_snap_factor_one() {
        let settings = CameraSettings {
            snap_factor: 1.0,
            ..Default::default()
        };
        let mut focal = FocalPoint::new(Vec3::ZERO);
        focal.follow(Vec3::new(0.5, 0.0, 0.0), &settings, 1.0 / 60.0);
        assert_eq!(focal.position(), Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_focal_point_closes_gap() {
        let settings = CameraSettings::default();
        let mut focal = FocalPoint::new(Vec3::ZERO);
        let target = Vec3::new(1.0, 0.0, 0.0);
        for _ in 0..600 {
            focal.follow(target, &settings, 1.0 / 60.0);
        }
        assert_eq!(focal.position(), target);
    }

    #[test]
    fn test_tracked_transform_destroy() {
        let tracked = TrackedTransform::new(Transform::from_position(Vec3::ONE));
        assert!(tracked.transform().is_some());
        tracked.destroy();
        assert!(tracked.is_destroyed());
        tracked.set_position(Vec3::ZERO);
        assert!(tracked.transform().is_none());
    }

    #[test]
    fn test_transform_heading() {
        let t = Transform::with_heading(Vec3::ZERO, 45.0);
        assert!((t.heading() - 45.0).abs() < 1e-3);
    }
}
