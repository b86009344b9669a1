//! Range notifications
//!
//! Range enter/exit events flow from whoever detects proximity (trigger
//! volumes, a [`super::RangeSensor`], game code) to the lock manager. There is
//! no global bus: the manager is handed a [`RangeSubscription`] when it is
//! created, and dropping the manager drops the subscription.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use super::target::{TargetHandle, WeakTarget};

/// A target entered or left lock-on range.
#[derive(Debug, Clone)]
pub enum RangeEvent {
    Entered(WeakTarget),
    Exited(WeakTarget),
}

type EventQueue = RefCell<VecDeque<RangeEvent>>;

/// Publisher side of the range channel.
#[derive(Debug, Default)]
pub struct RangeNotifier {
    subscribers: RefCell<Vec<Weak<EventQueue>>>,
}

impl RangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener. Events published before this call are not
    /// delivered to it.
    pub fn subscribe(&self) -> RangeSubscription {
        let queue = Rc::new(RefCell::new(VecDeque::new()));
        self.subscribers.borrow_mut().push(Rc::downgrade(&queue));
        RangeSubscription { queue }
    }

    /// Publish "target entered range".
    pub fn notify_entered(&self, target: &TargetHandle) {
        self.publish(RangeEvent::Entered(Rc::downgrade(target)));
    }

    /// Publish "target left range".
    pub fn notify_exited(&self, target: &TargetHandle) {
        self.publish(RangeEvent::Exited(Rc::downgrade(target)));
    }

    /// Publish a prepared event.
    pub fn publish(&self, event: RangeEvent) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|s| s.strong_count() > 0);
        for subscriber in subscribers.iter().filter_map(Weak::upgrade) {
            subscriber.borrow_mut().push_back(event.clone());
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|s| s.strong_count() > 0)
            .count()
    }
}

/// Listener side of the range channel. Dropping it unsubscribes.
#[derive(Debug)]
pub struct RangeSubscription {
    queue: Rc<EventQueue>,
}

impl RangeSubscription {
    /// Take every pending event in publish order.
    pub fn drain(&self) -> Vec<RangeEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    /// Number of events waiting.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targeting::LockOnTarget;
    use glam::Vec3;

    #[test]
    fn test_events_delivered_in_order() {
        let notifier = RangeNotifier::new();
        let subscription = notifier.subscribe();
        let target = LockOnTarget::new(Vec3::ZERO).into_handle();

        notifier.notify_entered(&target);
        notifier.notify_exited(&target);

        let events = subscription.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], RangeEvent::Entered(_)));
        assert!(matches!(events[1], RangeEvent::Exited(_)));
        assert_eq!(subscription.pending(), 0);
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let notifier = RangeNotifier::new();
        let subscription = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(notifier.subscriber_count(), 0);

        // Publishing with no listeners is fine
        let target = LockOnTarget::new(Vec3::ZERO).into_handle();
        notifier.notify_entered(&target);
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let notifier = RangeNotifier::new();
        let target = LockOnTarget::new(Vec3::ZERO).into_handle();
        notifier.notify_entered(&target);

        let subscription = notifier.subscribe();
        assert_eq!(subscription.pending(), 0);
    }
}
