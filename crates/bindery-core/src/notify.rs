#![forbid(unsafe_code)]

//! Change notification: subscriber callbacks with RAII lifetimes.
//!
//! A [`SubscriberSet`] holds its callbacks as `Weak` function pointers; the
//! strong half lives inside the [`Subscription`] guard returned to the
//! caller. Dropping the guard drops the callback, and dead entries are
//! swept lazily after each notification pass.
//!
//! # Invariants
//!
//! 1. Callbacks fire in registration order.
//! 2. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 3. Notification iterates a snapshot: a callback may subscribe or
//!    unsubscribe without corrupting the pass in flight. Entries added
//!    during a pass are first notified on the next one.
//!
//! # Failure Modes
//!
//! - Callback panic: propagates to the publisher; remaining callbacks in the
//!   pass are skipped. The set itself stays consistent.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::entity::EntityState;

type ChangeCallback = dyn Fn(&EntityState);

/// RAII guard tying a change callback's lifetime to the subscriber.
///
/// The guard owns the only strong reference to the callback; dropping it
/// unsubscribes. Guards are intentionally not `Clone`.
#[must_use = "dropping the subscription immediately unsubscribes the callback"]
pub struct Subscription {
    _callback: Rc<ChangeCallback>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// Insertion-ordered set of weak change callbacks.
#[derive(Default)]
pub(crate) struct SubscriberSet {
    entries: RefCell<Vec<Weak<ChangeCallback>>>,
}

impl SubscriberSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register `callback` and hand back the guard that keeps it alive.
    pub(crate) fn subscribe(&self, callback: impl Fn(&EntityState) + 'static) -> Subscription {
        let strong: Rc<ChangeCallback> = Rc::new(callback);
        self.entries.borrow_mut().push(Rc::downgrade(&strong));
        Subscription { _callback: strong }
    }

    /// Invoke every live callback with `state`, then sweep dead entries.
    pub(crate) fn notify(&self, state: &EntityState) {
        let snapshot: Vec<Weak<ChangeCallback>> = self.entries.borrow().clone();
        for weak in &snapshot {
            if let Some(callback) = weak.upgrade() {
                callback(state);
            }
        }
        self.entries
            .borrow_mut()
            .retain(|weak| weak.strong_count() > 0);
    }

    /// Live callback count. Dead entries pending sweep are not counted.
    pub(crate) fn live_count(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}
