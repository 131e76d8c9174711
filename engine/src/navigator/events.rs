//! Synchronous change notifications

use std::rc::Rc;
use tracing::trace;

/// Callback invoked when observed state changes
pub type ChangeCallback = Rc<dyn Fn()>;

/// Identifies a subscription so it can be detached later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// An ordered list of callbacks, invoked in subscription order
#[derive(Default)]
pub struct ChangeListeners {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, ChangeCallback)>,
}

impl std::fmt::Debug for ChangeListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeListeners")
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}

impl ChangeListeners {
    /// Create an empty listener list
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a callback
    pub fn subscribe(&mut self, callback: ChangeCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        trace!(?id, total = self.callbacks.len(), "Subscribed change listener");
        id
    }

    /// Detach a callback. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        before != self.callbacks.len()
    }

    /// Invoke every callback
    ///
    /// The list is cloned first so a callback may subscribe or unsubscribe
    /// through another path without observing a half-updated list.
    pub fn notify(&self) {
        for callback in self.snapshot() {
            callback();
        }
    }

    /// Clone the current callbacks so they can be invoked after releasing
    /// any borrow of this list
    pub fn snapshot(&self) -> Vec<ChangeCallback> {
        self.callbacks.iter().map(|(_, cb)| cb.clone()).collect()
    }

    /// Number of attached callbacks
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Check if nothing is subscribed
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_notify_in_subscription_order() {
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut listeners = ChangeListeners::new();

        for i in 0..3 {
            let order = order.clone();
            listeners.subscribe(Rc::new(move || order.borrow_mut().push(i)));
        }

        listeners.notify();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe() {
        let hits = Rc::new(Cell::new(0));
        let mut listeners = ChangeListeners::new();

        let counter = hits.clone();
        let id = listeners.subscribe(Rc::new(move || counter.set(counter.get() + 1)));
        listeners.notify();

        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.notify();

        assert_eq!(hits.get(), 1);
        assert!(listeners.is_empty());
    }
}
