//! Camera Module
//!
//! The third-person rig: pose primitives, occlusion avoidance, the behavior
//! states and their state machine, and the [`CameraRig`] that ties them
//! together. Window-system agnostic; the driver feeds input and reads back a
//! [`CameraPose`] each frame.

pub mod occlusion;
pub mod pose;
pub mod rig;
pub mod state_machine;
pub mod states;

pub use occlusion::{OcclusionProbe, OcclusionResolver, OcclusionState, near_plane_corners};
pub use pose::{
    CameraPose, FocalPoint, FollowTarget, Kinematics, OrbitRotation, TrackedTransform, Transform,
    orbit_position,
};
pub use rig::{CameraRig, CameraRigBuilder, RigSnapshot};
pub use state_machine::CameraStateMachine;
pub use states::{CameraState, StateContext, StateKind, Transition};
