//! Replay-latest multicast notification.
//!
//! A [`Subject`] holds the last published value and a registry of
//! callbacks. Publishing replaces the held value and then invokes every
//! registered callback synchronously, in registration order. A new
//! subscriber is called once immediately with the held value and then on
//! every later publish; it never sees earlier history.

use std::fmt;

/// Handle returned by [`Subject::subscribe`]; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

pub struct Subject<T> {
    current: T,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T> Subject<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// The most recently published value.
    pub fn value(&self) -> &T {
        &self.current
    }

    pub fn subscribe<F>(&mut self, mut callback: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        callback(&self.current);
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, value: T) {
        self.current = value;
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&self.current);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("current", &self.current)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
