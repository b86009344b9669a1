//! Tailcam Engine Library
//!
//! A third-person camera rig. Given a moving target and per-frame input it
//! produces a smoothly lagging camera pose that keeps the target framed,
//! pulls in when geometry blocks the view and can lock onto nearby targets.
//!
//! # Modules
//!
//! - [`camera`] - The rig, its behavior states, pose math and occlusion avoidance
//! - [`targeting`] - Lock-on candidates, range events and the lock manager
//! - [`query`] - Geometry query seam plus an AABB scene for tests and demos
//! - [`settings`] - Tunable camera settings, overrides and defaults
//! - [`input`] - Platform-agnostic key bindings and input-to-rig mapping
//! - [`math`] - Angle, range and easing helpers
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use tailcam_engine::{BoxScene, CameraRig, CameraSettings, TrackedTransform, Transform};
//!
//! let player = Rc::new(TrackedTransform::new(Transform::default()));
//! let scene = Rc::new(BoxScene::new());
//! scene.insert_box(Vec3::new(-1.0, 0.0, 3.0), Vec3::new(1.0, 4.0, 3.5));
//!
//! let mut rig = CameraRig::builder(CameraSettings::default())
//!     .target(player.clone())
//!     .geometry_query(scene)
//!     .build()?;
//!
//! loop {
//!     player.set_position(next_player_position());
//!     rig.tick(dt);
//!     rig.late_tick(dt);
//!     draw_from(rig.pose());
//! }
//! ```

pub mod camera;
pub mod error;
pub mod input;
pub mod math;
pub mod query;
pub mod settings;
pub mod targeting;

pub use camera::{
    CameraPose, CameraRig, CameraRigBuilder, FollowTarget, RigSnapshot, StateKind,
    TrackedTransform, Transform,
};
pub use error::{QueryError, RigError};
pub use input::{FrameInput, InputState, KeyCode, RigController};
pub use query::{BoxScene, GeometryQuery};
pub use settings::{CameraSettings, SettingsOverride};
pub use targeting::{LockOnTarget, RangeNotifier, RangeSensor, TargetLockManager, Targetable};
