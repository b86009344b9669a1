//! Error types
//!
//! Only construction and configuration can fail. Per-frame work degrades
//! gracefully instead of returning errors.

use thiserror::Error;

/// Errors raised while building a [`crate::camera::CameraRig`] or loading its
/// settings.
#[derive(Debug, Error)]
pub enum RigError {
    #[error("camera rig has no follow target")]
    MissingTarget,
    #[error("camera rig has no geometry query service")]
    MissingGeometryQuery,
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSettings { field: &'static str, reason: String },
    #[error("failed to parse settings: {0}")]
    SettingsParse(#[from] serde_json::Error),
}

/// Failure reported by a [`crate::query::GeometryQuery`] implementation.
///
/// The rig never propagates these; it treats them as "nothing hit".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("geometry query service unavailable")]
    Unavailable,
    #[error("queried object no longer exists")]
    TargetDestroyed,
}

impl RigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        RigError::InvalidSettings {
            field,
            reason: reason.into(),
        }
    }
}
