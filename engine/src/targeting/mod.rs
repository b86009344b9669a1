//! Targeting Module
//!
//! Lock-on support: the [`Targetable`] contract, the range notification
//! channel, an overlap-driven [`RangeSensor`], and the
//! [`TargetLockManager`] that owns the lock.

pub mod events;
pub mod manager;
pub mod sensor;
pub mod target;

pub use events::{RangeEvent, RangeNotifier, RangeSubscription};
pub use manager::{Reticle, TargetLockManager};
pub use sensor::RangeSensor;
pub use target::{LockOnTarget, TargetHandle, Targetable, WeakTarget, same_target};
