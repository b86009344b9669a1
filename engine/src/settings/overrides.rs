//! Partial settings overrides
//!
//! A control panel or a JSON snippet can tweak a handful of fields without
//! restating the full record. Unset fields leave the active value alone.

use serde::{Deserialize, Serialize};

use super::CameraSettings;
use crate::error::RigError;
use crate::math::{EaseCurve, FloatRange};

/// Every field optional; `None` means "keep the current value".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsOverride {
    pub base_distance: Option<f32>,
    pub default_distance: Option<f32>,
    pub distance_range: Option<FloatRange>,
    pub zoom_range: Option<FloatRange>,
    pub zoom_speed: Option<f32>,
    pub reset_speed: Option<f32>,
    pub offset_height: Option<f32>,
    pub lateral_offset: Option<f32>,
    pub move_speed: Option<f32>,
    pub snap_factor: Option<f32>,
    pub max_lag_distance: Option<f32>,
    pub ease_curve: Option<EaseCurve>,
    pub rotate_speed: Option<f32>,
    pub vertical_rotation: Option<FloatRange>,
    pub default_pitch: Option<f32>,
    pub invert_y: Option<bool>,
    pub snap_behind_target: Option<bool>,
    pub follow_enabled: Option<bool>,
    pub field_of_view: Option<f32>,
    pub aspect_ratio: Option<f32>,
    pub near_clip: Option<f32>,
    pub show_reticle: Option<bool>,
    pub lock_on_radius: Option<f32>,
}

impl SettingsOverride {
    /// Parse an override from JSON. Unknown keys are rejected.
    pub fn from_json(json: &str) -> Result<Self, RigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether the override changes anything.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply_to(&self, settings: &mut CameraSettings) {
        macro_rules! patch {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = self.$field.clone() {
                        settings.$field = value;
                    }
                )*
            };
        }

        patch!(
            base_distance,
            default_distance,
            distance_range,
            zoom_range,
            zoom_speed,
            reset_speed,
            offset_height,
            lateral_offset,
            move_speed,
            snap_factor,
            max_lag_distance,
            ease_curve,
            rotate_speed,
            vertical_rotation,
            default_pitch,
            invert_y,
            snap_behind_target,
            follow_enabled,
            field_of_view,
            aspect_ratio,
            near_clip,
            show_reticle,
            lock_on_radius,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_only_touches_set_fields() {
        let mut settings = CameraSettings::default();
        let patch = SettingsOverride::from_json(r#"{ "rotate_speed": 30.0, "invert_y": true }"#)
            .unwrap();

        settings.apply_override(&patch).unwrap();
        assert_eq!(settings.rotate_speed, 30.0);
        assert!(settings.invert_y);
        assert_eq!(settings.move_speed, CameraSettings::default().move_speed);
    }

    #[test]
    fn test_invalid_override_leaves_settings_untouched() {
        let mut settings = CameraSettings::default();
        let patch = SettingsOverride {
            snap_factor: Some(2.0),
            rotate_speed: Some(99.0),
            ..Default::default()
        };

        assert!(settings.apply_override(&patch).is_err());
        assert_eq!(settings, CameraSettings::default());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(SettingsOverride::from_json(r#"{ "warp_speed": 9 }"#).is_err());
    }

    #[test]
    fn test_narrowed_zoom_range_reclamps_distances() {
        let mut settings = CameraSettings::default();
        settings.set_zoom_distance(12.0);
        settings.desired_distance = 12.0;

        let patch = SettingsOverride {
            zoom_range: Some(FloatRange::new(1.0, 6.0)),
            ..Default::default()
        };
        settings.apply_override(&patch).unwrap();
        assert_eq!(settings.zoom_distance, 6.0);
        assert_eq!(settings.desired_distance, 6.0);
    }

    #[test]
    fn test_empty_override() {
        assert!(SettingsOverride::default().is_empty());
    }
}
