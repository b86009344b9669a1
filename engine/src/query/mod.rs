//! Geometry Query Module
//!
//! The rig never owns a physics world. It asks an external service for
//! line-of-sight and overlap answers through [`GeometryQuery`], and treats any
//! [`QueryError`] as "nothing there" for the current frame.
//!
//! [`BoxScene`] is a small axis-aligned box world implementing the trait, used
//! by the tests and the demo binary.

pub mod scene;

pub use scene::{BoxScene, SceneBox};

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use crate::error::QueryError;

/// Identity of a collider, or of the root object a collider belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderId(pub u64);

/// Bit set of collision layers (32 layers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const NONE: LayerMask = LayerMask(0);

    /// Mask containing a single layer. Layers above 31 produce an empty mask.
    pub const fn layer(index: u8) -> Self {
        if index < 32 {
            LayerMask(1 << index)
        } else {
            LayerMask::NONE
        }
    }

    /// Whether any layer of `other` is in this mask.
    #[inline]
    pub const fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    /// This mask with the layers of `other` removed.
    #[inline]
    pub const fn without(self, other: LayerMask) -> Self {
        LayerMask(self.0 & !other.0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

/// First obstruction along a line query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineHit {
    /// Distance from the query start to the hit point
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Root object of the collider that was hit
    pub collider_root: ColliderId,
}

/// Line-of-sight and overlap queries against an external world.
///
/// Implementations must be pure with respect to the rig: answering a query
/// never mutates camera state. Errors mean the answer is unavailable this
/// frame (world not ready, object destroyed mid-query).
pub trait GeometryQuery {
    /// First hit on the segment `from → to` against colliders in `mask`.
    fn line_cast(&self, from: Vec3, to: Vec3, mask: LayerMask)
    -> Result<Option<LineHit>, QueryError>;

    /// Colliders in `mask` overlapping the sphere.
    fn overlap_sphere(
        &self,
        center: Vec3,
        radius: f32,
        mask: LayerMask,
    ) -> Result<Vec<ColliderId>, QueryError>;
}
