//! Overlap-based range detection
//!
//! Produces range enter/exit events for registered targets by running a
//! sphere overlap around a center point and diffing against the previous
//! result.

use std::rc::Rc;

use glam::Vec3;
use tracing::{trace, warn};

use super::events::{RangeEvent, RangeNotifier};
use super::target::{TargetHandle, WeakTarget, same_target};
use crate::query::{GeometryQuery, LayerMask};

#[derive(Debug)]
pub struct RangeSensor {
    radius: f32,
    mask: LayerMask,
    candidates: Vec<WeakTarget>,
    in_range: Vec<WeakTarget>,
}

impl RangeSensor {
    pub fn new(radius: f32, mask: LayerMask) -> Self {
        Self {
            radius: radius.max(0.0),
            mask,
            candidates: Vec::new(),
            in_range: Vec::new(),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    /// Watch a target. It is matched against overlap results by its
    /// [`collider`](super::Targetable::collider); targets without one are
    /// never detected.
    pub fn register(&mut self, target: &TargetHandle) {
        let weak = Rc::downgrade(target);
        if !self.candidates.iter().any(|c| same_target(c, &weak)) {
            self.candidates.push(weak);
        }
    }

    /// Stop watching a target. An in-range target is not reported as exiting.
    pub fn unregister(&mut self, target: &TargetHandle) {
        let weak = Rc::downgrade(target);
        self.candidates.retain(|c| !same_target(c, &weak));
        self.in_range.retain(|c| !same_target(c, &weak));
    }

    /// Number of watched targets currently inside the sphere.
    pub fn in_range_count(&self) -> usize {
        self.in_range.len()
    }

    /// Forget the previous result so the next `sense` reports every target
    /// inside the sphere as entering.
    pub fn reset(&mut self) {
        self.in_range.clear();
    }

    /// Run one overlap around `center` and publish the differences.
    ///
    /// A failed query publishes nothing and keeps the previous result.
    /// Returns the number of events published.
    pub fn sense(
        &mut self,
        center: Vec3,
        query: &dyn GeometryQuery,
        notifier: &RangeNotifier,
    ) -> usize {
        let overlaps = match query.overlap_sphere(center, self.radius, self.mask) {
            Ok(overlaps) => overlaps,
            Err(err) => {
                warn!(%err, "Range overlap failed; no targets found this frame");
                return 0;
            }
        };

        self.candidates.retain(|c| c.strong_count() > 0);

        let now_in_range: Vec<WeakTarget> = self
            .candidates
            .iter()
            .filter(|c| {
                c.upgrade()
                    .and_then(|t| t.collider())
                    .is_some_and(|collider| overlaps.contains(&collider))
            })
            .cloned()
            .collect();

        let mut published = 0;
        for previous in &self.in_range {
            if !now_in_range.iter().any(|n| same_target(n, previous)) {
                notifier.publish(RangeEvent::Exited(previous.clone()));
                published += 1;
            }
        }
        for current in &now_in_range {
            if !self.in_range.iter().any(|p| same_target(p, current)) {
                notifier.publish(RangeEvent::Entered(current.clone()));
                published += 1;
            }
        }

        if published > 0 {
            trace!(published, in_range = now_in_range.len(), "Range sensor changes");
        }
        self.in_range = now_in_range;
        published
    }
}
