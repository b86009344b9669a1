//! Camera Settings
//!
//! Centralized configuration for the rig: distances, speeds, rotation limits,
//! lens parameters and feature flags. Plain data with clamping helpers and
//! default/override/reset semantics; nothing here is persisted.

pub mod overrides;

pub use overrides::SettingsOverride;

use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::math::{EaseCurve, FloatRange, clamp_to_range};
use crate::query::LayerMask;

/// Values captured by [`CameraSettings::store_defaults`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StoredDefaults {
    pub offset_height: f32,
    pub lateral_offset: f32,
    pub distance: f32,
}

/// Configuration for a [`crate::camera::CameraRig`].
///
/// `Default` returns a rig tuned for a human-sized avatar: 4.5m behind, 1.5m
/// look height, collision and targeting on. The runtime distance fields
/// (`offset_distance`, `desired_distance`) are written by the rig every frame
/// and are not part of the serialized form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    // === Distance ===
    /// Closest resting distance; zoom never requests less than this
    pub base_distance: f32,
    /// Distance restored by a reset
    pub default_distance: f32,
    /// Hard limits for the camera distance when zoom is disabled
    pub distance_range: FloatRange,
    /// Distance currently applied to the camera
    #[serde(skip)]
    pub offset_distance: f32,
    /// Distance the camera is moving toward
    #[serde(skip)]
    pub desired_distance: f32,
    /// Distance requested by the zoom control
    pub zoom_distance: f32,
    /// Limits for the zoom distance (and all distances while zoom is enabled)
    pub zoom_range: FloatRange,
    /// Distance change per second while pulling in (and per unit of zoom input)
    pub zoom_speed: f32,
    /// Distance change per second while restoring after occlusion clears
    pub reset_speed: f32,

    // === Offsets ===
    /// Height of the look point above the target origin (meters)
    pub offset_height: f32,
    /// Sideways shift of the camera, positive = right (meters)
    pub lateral_offset: f32,
    /// Absolute limit for `lateral_offset`
    pub max_lateral_offset: f32,

    // === Focal point lag ===
    /// Closing speed of the focal point (m/s) before easing
    pub move_speed: f32,
    /// 0 = pure speed-limited chase, 1 = focal point snaps onto the target
    pub snap_factor: f32,
    /// Leash length between focal point and target (meters)
    pub max_lag_distance: f32,
    /// Multiplier applied to closing/turning speed over the normalized gap
    pub ease_curve: EaseCurve,

    // === Rotation ===
    /// Rotation speed: degrees per unit of look input per second, and the
    /// per-second blend weight for smoothed turns
    pub rotate_speed: f32,
    /// Allowed pitch in degrees (positive = camera above, looking down)
    pub vertical_rotation: FloatRange,
    /// Pitch the follow state settles at (degrees)
    pub default_pitch: f32,
    /// Yaw offset from directly behind the target that follow settles at
    pub default_yaw_offset: f32,
    /// Flip vertical look input
    pub invert_y: bool,
    /// Follow state swings back behind the target
    pub snap_behind_target: bool,
    /// Follow state moves the camera at all
    pub follow_enabled: bool,
    /// Inside this angle (degrees) the follow swing snaps into place
    pub snap_angle: f32,

    // === Lens ===
    /// Vertical field of view in degrees
    pub field_of_view: f32,
    /// Viewport width / height
    pub aspect_ratio: f32,
    /// Near clip plane distance (meters)
    pub near_clip: f32,
    /// Layers that block the camera
    pub collision_layers: LayerMask,

    // === Features ===
    pub enable_collision: bool,
    pub enable_zoom: bool,
    pub enable_targeting: bool,
    /// Show the reticle while locked on
    pub show_reticle: bool,
    /// Radius of the lock-on range sensor around the focal point
    pub lock_on_radius: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            base_distance: 2.0,
            default_distance: 4.5,
            distance_range: FloatRange::new(1.0, 15.0),
            offset_distance: 4.5,
            desired_distance: 4.5,
            zoom_distance: 4.5,
            zoom_range: FloatRange::new(1.0, 15.0),
            zoom_speed: 10.0,
            reset_speed: 5.0,
            offset_height: 1.5,
            lateral_offset: 0.0,
            max_lateral_offset: 5.0,
            move_speed: 12.0,
            snap_factor: 0.0,
            max_lag_distance: 1.5,
            ease_curve: EaseCurve::default(),
            rotate_speed: 15.0,
            vertical_rotation: FloatRange::new(-30.0, 70.0),
            default_pitch: 15.0,
            default_yaw_offset: 0.0,
            invert_y: false,
            snap_behind_target: true,
            follow_enabled: true,
            snap_angle: 2.5,
            field_of_view: 60.0,
            aspect_ratio: 16.0 / 9.0,
            near_clip: 0.3,
            collision_layers: LayerMask::ALL,
            enable_collision: true,
            enable_zoom: true,
            enable_targeting: true,
            show_reticle: true,
            lock_on_radius: 12.0,
        }
    }
}

impl CameraSettings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a full settings record from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, RigError> {
        let mut settings: CameraSettings = serde_json::from_str(json)?;
        settings.validate()?;
        settings.prepare_runtime();
        Ok(settings)
    }

    /// Serialize the tunable fields to pretty JSON.
    pub fn to_json(&self) -> Result<String, RigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every field for values the rig cannot work with.
    pub fn validate(&self) -> Result<(), RigError> {
        for (field, range) in [
            ("distance_range", &self.distance_range),
            ("zoom_range", &self.zoom_range),
            ("vertical_rotation", &self.vertical_rotation),
        ] {
            if !range.is_valid() {
                return Err(RigError::invalid(
                    field,
                    format!("min {} must not exceed max {}", range.min, range.max),
                ));
            }
        }
        if self.distance_range.min < 0.0 || self.zoom_range.min < 0.0 {
            return Err(RigError::invalid("distance_range", "distances must be non-negative"));
        }
        if !self.distance_range.contains(self.default_distance) {
            return Err(RigError::invalid(
                "default_distance",
                format!(
                    "{} lies outside [{}, {}]",
                    self.default_distance, self.distance_range.min, self.distance_range.max
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.snap_factor) {
            return Err(RigError::invalid("snap_factor", "must lie in [0, 1]"));
        }
        for (field, value) in [
            ("move_speed", self.move_speed),
            ("zoom_speed", self.zoom_speed),
            ("reset_speed", self.reset_speed),
            ("rotate_speed", self.rotate_speed),
            ("max_lag_distance", self.max_lag_distance),
            ("lock_on_radius", self.lock_on_radius),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RigError::invalid(field, "must be finite and non-negative"));
            }
        }
        if !(self.near_clip > 0.0) {
            return Err(RigError::invalid("near_clip", "must be positive"));
        }
        if !(self.field_of_view > 0.0 && self.field_of_view < 180.0) {
            return Err(RigError::invalid("field_of_view", "must lie in (0, 180)"));
        }
        if !(self.aspect_ratio > 0.0) {
            return Err(RigError::invalid("aspect_ratio", "must be positive"));
        }
        Ok(())
    }

    /// Initialize the runtime distance fields from the configured values.
    pub fn prepare_runtime(&mut self) {
        self.zoom_distance = self.zoom_range.clamp(self.zoom_distance);
        self.lateral_offset = self
            .lateral_offset
            .clamp(-self.max_lateral_offset.abs(), self.max_lateral_offset.abs());
        let start = self.requested_distance();
        self.offset_distance = start;
        self.desired_distance = start;
    }

    /// Limits applied to any distance written into the settings.
    pub fn distance_limits(&self) -> FloatRange {
        if self.enable_zoom {
            self.zoom_range
        } else {
            self.distance_range
        }
    }

    /// Clamp a distance into the active limits.
    #[inline]
    pub fn clamp_distance(&self, distance: f32) -> f32 {
        clamp_to_range(distance, self.distance_limits())
    }

    /// Distance the camera rests at when nothing blocks it.
    ///
    /// With zoom enabled this is `max(base_distance, zoom_distance)`.
    pub fn requested_distance(&self) -> f32 {
        let requested = if self.enable_zoom {
            self.base_distance.max(self.zoom_distance)
        } else {
            self.default_distance
        };
        self.clamp_distance(requested)
    }

    /// Set the zoom distance, clamped to the zoom range.
    pub fn set_zoom_distance(&mut self, distance: f32) {
        self.zoom_distance = self.zoom_range.clamp(distance);
    }

    /// Write a desired distance, clamped to the active limits.
    pub fn set_desired_distance(&mut self, distance: f32) {
        self.desired_distance = self.clamp_distance(distance);
    }

    /// Set the lateral offset, clamped to `max_lateral_offset`.
    pub fn set_lateral_offset(&mut self, offset: f32) {
        let limit = self.max_lateral_offset.abs();
        self.lateral_offset = offset.clamp(-limit, limit);
    }

    /// Clamp a pitch angle into the vertical rotation range.
    #[inline]
    pub fn clamp_pitch(&self, pitch: f32) -> f32 {
        clamp_to_range(pitch, self.vertical_rotation)
    }

    /// Snapshot the values restored by [`CameraSettings::reset_to_defaults`].
    pub fn store_defaults(&self) -> StoredDefaults {
        StoredDefaults {
            offset_height: self.offset_height,
            lateral_offset: self.lateral_offset,
            distance: self.default_distance,
        }
    }

    /// Restore height, lateral offset and distance from a snapshot, then
    /// reset the ranges and distances.
    pub fn reset_to_defaults(&mut self, stored: &StoredDefaults) {
        self.offset_height = stored.offset_height;
        self.lateral_offset = stored.lateral_offset;
        self.default_distance = stored.distance;
        self.distance_range.reset();
        self.zoom_range.reset();
        self.set_zoom_distance(self.default_distance);
        let distance = self.requested_distance();
        self.offset_distance = distance;
        self.desired_distance = distance;
    }

    /// Apply a partial override on top of the current values.
    ///
    /// The result is validated; on error the settings are left untouched.
    pub fn apply_override(&mut self, patch: &SettingsOverride) -> Result<(), RigError> {
        let mut next = self.clone();
        patch.apply_to(&mut next);
        next.validate()?;
        next.zoom_distance = next.zoom_range.clamp(next.zoom_distance);
        next.set_lateral_offset(next.lateral_offset);
        next.desired_distance = next.clamp_distance(next.desired_distance);
        next.offset_distance = next.clamp_distance(next.offset_distance);
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = CameraSettings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.zoom_range.contains(settings.zoom_distance));
    }

    #[test]
    fn test_zoom_distance_is_clamped() {
        let mut settings = CameraSettings::default();
        settings.set_zoom_distance(100.0);
        assert_eq!(settings.zoom_distance, settings.zoom_range.max);
        settings.set_zoom_distance(-4.0);
        assert_eq!(settings.zoom_distance, settings.zoom_range.min);
    }

    #[test]
    fn test_requested_distance_respects_base() {
        let mut settings = CameraSettings::default();
        settings.base_distance = 3.0;
        settings.set_zoom_distance(1.5);
        assert_eq!(settings.requested_distance(), 3.0);

        settings.set_zoom_distance(8.0);
        assert_eq!(settings.requested_distance(), 8.0);

        settings.enable_zoom = false;
        assert_eq!(settings.requested_distance(), settings.default_distance);
    }

    #[test]
    fn test_invalid_snap_factor_rejected() {
        let settings = CameraSettings {
            snap_factor: 1.5,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, RigError::InvalidSettings { field: "snap_factor", .. }));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let settings = CameraSettings {
            vertical_rotation: FloatRange::new(60.0, -60.0),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_store_and_reset_defaults() {
        let mut settings = CameraSettings::default();
        let stored = settings.store_defaults();

        settings.offset_height = 3.0;
        settings.set_lateral_offset(2.0);
        settings.offset_distance = 9.0;
        settings.desired_distance = 9.0;

        settings.reset_to_defaults(&stored);
        assert_eq!(settings.offset_height, 1.5);
        assert_eq!(settings.lateral_offset, 0.0);
        assert_eq!(settings.offset_distance, 4.5);
        assert_eq!(settings.desired_distance, 4.5);
    }

    #[test]
    fn test_lateral_offset_is_limited() {
        let mut settings = CameraSettings::default();
        settings.set_lateral_offset(-20.0);
        assert_eq!(settings.lateral_offset, -5.0);
    }

    #[test]
    fn test_json_round_trip_keeps_tunables() {
        let mut settings = CameraSettings::default();
        settings.rotate_speed = 42.0;
        settings.ease_curve = EaseCurve::Linear;

        let json = settings.to_json().unwrap();
        let parsed = CameraSettings::from_json(&json).unwrap();
        assert_eq!(parsed.rotate_speed, 42.0);
        assert_eq!(parsed.ease_curve, EaseCurve::Linear);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed = CameraSettings::from_json(r#"{ "move_speed": 3.0 }"#).unwrap();
        assert_eq!(parsed.move_speed, 3.0);
        assert_eq!(parsed.default_distance, 4.5);
        assert_eq!(parsed.offset_distance, parsed.requested_distance());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = CameraSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, RigError::SettingsParse(_)));
    }
}
