//! Target Lock Manager
//!
//! Keeps the registry of lock-on candidates currently in range, picks and
//! cycles the locked target, and supplies the aim override the LockOn camera
//! state looks at.
//!
//! The registry is non-owning: entries are [`WeakTarget`]s and dead entries are
//! pruned whenever the registry is walked.

use std::rc::Rc;

use glam::Vec3;
use tracing::debug;

use super::events::{RangeEvent, RangeSubscription};
use super::target::{TargetHandle, WeakTarget, same_target};

/// Lock-on indicator state for the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reticle {
    pub visible: bool,
    /// World position the reticle should be drawn at
    pub position: Option<Vec3>,
}

/// Registry of in-range targets plus the current lock.
#[derive(Debug)]
pub struct TargetLockManager {
    targets_in_range: Vec<WeakTarget>,
    current_target: Option<WeakTarget>,
    current_index: usize,
    is_active: bool,
    is_enabled: bool,
    show_reticle: bool,
    reticle_visible: bool,
    subscription: Option<RangeSubscription>,
}

impl Default for TargetLockManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetLockManager {
    /// Enabled manager with an empty registry and no range subscription.
    pub fn new() -> Self {
        Self {
            targets_in_range: Vec::new(),
            current_target: None,
            current_index: 0,
            is_active: false,
            is_enabled: true,
            show_reticle: true,
            reticle_visible: false,
            subscription: None,
        }
    }

    /// Manager fed by a range notification subscription.
    pub fn with_subscription(subscription: RangeSubscription) -> Self {
        let mut manager = Self::new();
        manager.subscription = Some(subscription);
        manager
    }

    /// Whether the reticle is shown while locked.
    pub fn set_show_reticle(&mut self, show: bool) {
        self.show_reticle = show;
        if !show {
            self.reticle_visible = false;
        } else if self.is_active {
            self.reticle_visible = true;
        }
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Register a target that entered range. Duplicates are ignored.
    pub fn add_target_in_range(&mut self, target: &TargetHandle) {
        self.add_weak(Rc::downgrade(target));
    }

    /// Unregister a target that left range.
    ///
    /// If it is the locked target, it loses focus and the lock ends. Unknown
    /// targets are ignored.
    pub fn remove_target_in_range(&mut self, target: &TargetHandle) {
        self.remove_weak(&Rc::downgrade(target));
    }

    fn add_weak(&mut self, target: WeakTarget) {
        if target.strong_count() == 0 {
            return;
        }
        if self.targets_in_range.iter().any(|t| same_target(t, &target)) {
            return;
        }
        self.targets_in_range.push(target);
        debug!(count = self.targets_in_range.len(), "Target entered lock-on range");
    }

    fn remove_weak(&mut self, target: &WeakTarget) {
        let Some(index) = self
            .targets_in_range
            .iter()
            .position(|t| same_target(t, target))
        else {
            return;
        };

        let was_current = self
            .current_target
            .as_ref()
            .is_some_and(|current| same_target(current, target));

        if was_current {
            self.end_target_lock();
        }
        self.targets_in_range.remove(index);
        if self.is_active && index < self.current_index {
            self.current_index -= 1;
        }
        debug!(
            count = self.targets_in_range.len(),
            ended_lock = was_current,
            "Target left lock-on range"
        );
    }

    /// Drop registry entries whose targets no longer exist.
    ///
    /// A destroyed locked target ends the lock; it cannot be told it lost
    /// focus.
    pub fn prune(&mut self) {
        let current_dead = self
            .current_target
            .as_ref()
            .is_some_and(|current| current.strong_count() == 0);
        if current_dead {
            debug!("Locked target destroyed; ending lock");
            self.clear_lock();
        }

        self.targets_in_range.retain(|t| t.strong_count() > 0);
        self.resync_index();
    }

    /// Apply pending range events from the subscription, in order.
    ///
    /// Returns the number of events processed.
    pub fn process_range_events(&mut self) -> usize {
        let Some(subscription) = self.subscription.as_ref() else {
            return 0;
        };
        let events = subscription.drain();
        let count = events.len();
        for event in events {
            match event {
                RangeEvent::Entered(target) => self.add_weak(target),
                RangeEvent::Exited(target) => self.remove_weak(&target),
            }
        }
        count
    }

    /// Whether the target is registered.
    pub fn contains(&self, target: &TargetHandle) -> bool {
        let weak = Rc::downgrade(target);
        self.targets_in_range.iter().any(|t| same_target(t, &weak))
    }

    /// Number of registered targets (including any not yet pruned).
    pub fn target_count(&self) -> usize {
        self.targets_in_range.len()
    }

    /// Live registered targets in range-entry order.
    pub fn targets_in_range(&self) -> Vec<TargetHandle> {
        self.targets_in_range
            .iter()
            .filter_map(|t| t.upgrade())
            .collect()
    }

    // ========================================================================
    // Lock
    // ========================================================================

    /// Lock onto the candidate nearest to `focal_point`.
    ///
    /// Does nothing when already active, disabled, or without candidates.
    /// Returns whether a lock is active afterwards.
    pub fn begin_target_lock(&mut self, focal_point: Vec3) -> bool {
        if self.is_active || !self.is_enabled {
            return self.is_active;
        }
        self.prune();

        let mut best: Option<(usize, f32)> = None;
        for (index, target) in self.targets_in_range.iter().enumerate() {
            let Some(target) = target.upgrade() else {
                continue;
            };
            let distance_sq = target.look_at_position().distance_squared(focal_point);
            if best.is_none_or(|(_, best_sq)| distance_sq < best_sq) {
                best = Some((index, distance_sq));
            }
        }

        let Some((index, distance_sq)) = best else {
            debug!("Lock-on requested with no targets in range");
            return false;
        };

        self.focus(index);
        self.is_active = true;
        self.reticle_visible = self.show_reticle;
        debug!(index, distance = distance_sq.sqrt(), "Target lock started");
        true
    }

    /// Release the current lock, if any.
    pub fn end_target_lock(&mut self) {
        if let Some(target) = self.current_target.as_ref().and_then(|t| t.upgrade()) {
            target.on_focus_lost();
        }
        if self.is_active {
            debug!("Target lock ended");
        }
        self.clear_lock();
    }

    fn clear_lock(&mut self) {
        self.current_target = None;
        self.current_index = 0;
        self.is_active = false;
        self.reticle_visible = false;
    }

    /// End the lock if active, otherwise begin one.
    pub fn toggle_lock_on(&mut self, focal_point: Vec3) -> bool {
        if self.is_active {
            self.end_target_lock();
            false
        } else {
            self.begin_target_lock(focal_point)
        }
    }

    /// Advance the lock to the next candidate in range-entry order.
    pub fn cycle_targets(&mut self) {
        if !self.is_active {
            return;
        }
        self.prune();
        let count = self.targets_in_range.len();
        if !self.is_active || count <= 1 {
            return;
        }
        let next = (self.current_index + 1) % count;
        self.switch_to(next);
    }

    /// Move the lock to the candidate nearest the current target among those
    /// lying in `direction` as seen from `camera_position`.
    ///
    /// With exactly two candidates this toggles between them.
    pub fn cycle_targets_toward(&mut self, direction: Vec3, camera_position: Vec3) {
        if !self.is_active {
            return;
        }
        self.prune();
        let count = self.targets_in_range.len();
        if !self.is_active || count <= 1 {
            return;
        }
        if count == 2 {
            self.switch_to(1 - self.current_index);
            return;
        }

        let Some(current_position) = self.aim_override() else {
            return;
        };

        let mut best: Option<(usize, f32)> = None;
        for (index, target) in self.targets_in_range.iter().enumerate() {
            if index == self.current_index {
                continue;
            }
            let Some(target) = target.upgrade() else {
                continue;
            };
            let position = target.look_at_position();
            if (position - camera_position).dot(direction) <= 0.0 {
                continue;
            }
            let distance_sq = position.distance_squared(current_position);
            if best.is_none_or(|(_, best_sq)| distance_sq < best_sq) {
                best = Some((index, distance_sq));
            }
        }

        if let Some((index, _)) = best {
            self.switch_to(index);
        }
    }

    fn switch_to(&mut self, index: usize) {
        if index == self.current_index {
            return;
        }
        if let Some(previous) = self.current_target.as_ref().and_then(|t| t.upgrade()) {
            previous.on_focus_lost();
        }
        self.focus(index);
        debug!(index, "Lock switched target");
    }

    fn focus(&mut self, index: usize) {
        let target = self.targets_in_range[index].clone();
        if let Some(handle) = target.upgrade() {
            handle.on_focus_received();
        }
        self.current_target = Some(target);
        self.current_index = index;
    }

    fn resync_index(&mut self) {
        if let Some(current) = self.current_target.as_ref() {
            match self
                .targets_in_range
                .iter()
                .position(|t| same_target(t, current))
            {
                Some(index) => self.current_index = index,
                None => self.clear_lock(),
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// Enable or disable locking. Disabling ends any active lock.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.end_target_lock();
        }
        self.is_enabled = enabled;
    }

    /// Index of the locked target in the registry.
    pub fn current_index(&self) -> Option<usize> {
        self.is_active.then_some(self.current_index)
    }

    /// The locked target, if it still exists.
    pub fn current_target(&self) -> Option<TargetHandle> {
        if !self.is_active {
            return None;
        }
        self.current_target.as_ref().and_then(|t| t.upgrade())
    }

    /// Point the camera should aim at instead of the followed target.
    pub fn aim_override(&self) -> Option<Vec3> {
        self.current_target().map(|t| t.look_at_position())
    }

    pub fn reticle(&self) -> Reticle {
        Reticle {
            visible: self.reticle_visible,
            position: self.aim_override(),
        }
    }
}

impl Drop for TargetLockManager {
    fn drop(&mut self) {
        self.end_target_lock();
    }
}
