//! Lock-on targets
//!
//! Anything the camera can lock onto implements [`Targetable`]. The rig only
//! ever holds weak references to targets; the world owns them.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use glam::Vec3;

use crate::query::ColliderId;

/// An entity the camera can lock onto.
///
/// Focus callbacks take `&self`; implementors keep their own interior
/// mutability since the rig and the world share the object.
pub trait Targetable {
    /// Point the camera aims at while locked on
    fn look_at_position(&self) -> Vec3;
    /// Whether the target currently holds camera focus
    fn is_active(&self) -> bool;
    /// Called when the camera locks onto this target
    fn on_focus_received(&self);
    /// Called when the camera releases this target
    fn on_focus_lost(&self);
    /// Collider used to match overlap query results to this target
    fn collider(&self) -> Option<ColliderId> {
        None
    }
}

/// Shared, owning handle held by the world.
pub type TargetHandle = Rc<dyn Targetable>;

/// Non-owning handle held by the rig.
pub type WeakTarget = Weak<dyn Targetable>;

/// Identity comparison between two target handles.
#[inline]
pub fn same_target(a: &WeakTarget, b: &WeakTarget) -> bool {
    Weak::ptr_eq(a, b)
}

/// Ready-made [`Targetable`] with a movable look point.
#[derive(Debug)]
pub struct LockOnTarget {
    position: Cell<Vec3>,
    look_height: f32,
    collider: Option<ColliderId>,
    active: Cell<bool>,
    focus_events: Cell<u32>,
}

impl LockOnTarget {
    pub fn new(position: Vec3) -> Self {
        Self {
            position: Cell::new(position),
            look_height: 0.0,
            collider: None,
            active: Cell::new(false),
            focus_events: Cell::new(0),
        }
    }

    /// Aim this far above the target origin.
    pub fn with_look_height(mut self, height: f32) -> Self {
        self.look_height = height;
        self
    }

    /// Associate a collider for overlap-based range detection.
    pub fn with_collider(mut self, collider: ColliderId) -> Self {
        self.collider = Some(collider);
        self
    }

    /// Wrap in a shared handle.
    pub fn into_handle(self) -> TargetHandle {
        Rc::new(self)
    }

    pub fn position(&self) -> Vec3 {
        self.position.get()
    }

    pub fn set_position(&self, position: Vec3) {
        self.position.set(position);
    }

    /// How many focus changes (received + lost) this target has seen.
    pub fn focus_events(&self) -> u32 {
        self.focus_events.get()
    }
}

impl Targetable for LockOnTarget {
    fn look_at_position(&self) -> Vec3 {
        self.position.get() + Vec3::Y * self.look_height
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn on_focus_received(&self) {
        self.active.set(true);
        self.focus_events.set(self.focus_events.get() + 1);
    }

    fn on_focus_lost(&self) {
        self.active.set(false);
        self.focus_events.set(self.focus_events.get() + 1);
    }

    fn collider(&self) -> Option<ColliderId> {
        self.collider
    }
}
