//! Subscriber registry
//!
//! Subscribers are called with the new state after every completed terminal
//! step, in registration order. They only see future changes: subscribing
//! does not replay the current state.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

pub(crate) type Callback<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Identifies one registration within a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub(crate) struct Subscribers<S> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback<S>)>,
}

impl<S> Subscribers<S> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, callback: Callback<S>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Callbacks registered right now, in registration order
    pub(crate) fn snapshot(&self) -> Vec<Callback<S>> {
        self.entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Handle returned by `Store::subscribe`
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`]
/// or `Store::unsubscribe`.
pub struct Subscription<S> {
    id: SubscriptionId,
    subscribers: Weak<Mutex<Subscribers<S>>>,
}

impl<S> Subscription<S> {
    pub(crate) fn new(id: SubscriptionId, subscribers: &Arc<Mutex<Subscribers<S>>>) -> Self {
        Self {
            id,
            subscribers: Arc::downgrade(subscribers),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the subscriber. Returns false if it was already removed.
    pub fn unsubscribe(&self) -> bool {
        match self.subscribers.upgrade() {
            Some(subscribers) => {
                let removed = subscribers.lock().remove(self.id);
                if removed {
                    log::trace!("Unsubscribed {:?}", self.id);
                }
                removed
            }
            None => false,
        }
    }

    pub(crate) fn belongs_to(&self, subscribers: &Arc<Mutex<Subscribers<S>>>) -> bool {
        std::ptr::eq(self.subscribers.as_ptr(), Arc::as_ptr(subscribers))
    }
}

impl<S> std::fmt::Debug for Subscription<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
