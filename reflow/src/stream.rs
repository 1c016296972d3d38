//! Single-threaded event streams with explicit subscription handles.
//!
//! Delivery is synchronous: `emit` returns after every live subscriber has
//! seen the value. Subscribers may be scoped to a [`CancellationToken`], which
//! ends them the same way `unsubscribe` does.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

pub use tokio_util::sync::CancellationToken;

/// Handle to one subscription.
///
/// Dropping the handle keeps the subscription alive; call
/// [`unsubscribe`](Self::unsubscribe) to end it.
#[derive(Debug, Clone)]
pub struct Subscription {
    active: Rc<Cell<bool>>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        self.active.set(false);
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

struct Subscriber<T> {
    active: Rc<Cell<bool>>,
    until: Option<CancellationToken>,
    callback: Box<dyn FnMut(&T)>,
}

impl<T> Subscriber<T> {
    fn is_live(&self) -> bool {
        if !self.active.get() {
            return false;
        }
        if self.until.as_ref().is_some_and(CancellationToken::is_cancelled) {
            self.active.set(false);
            return false;
        }
        true
    }
}

struct Inner<T> {
    subscribers: Vec<Subscriber<T>>,
    latest: Option<T>,
    replay: bool,
    completed: bool,
    /// Values waiting for delivery while a delivery pass is running.
    queued: VecDeque<T>,
    delivering: bool,
}

/// Multicast stream of `T` values.
pub struct EventStream<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for EventStream<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Default for EventStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> EventStream<T> {
    /// Stream that only delivers values emitted after subscription.
    pub fn new() -> Self {
        Self::with_replay(false, None)
    }

    /// Stream that hands its latest value to every new subscriber.
    pub fn replaying(initial: Option<T>) -> Self {
        Self::with_replay(true, initial)
    }

    fn with_replay(replay: bool, latest: Option<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                subscribers: Vec::new(),
                latest,
                replay,
                completed: false,
                queued: VecDeque::new(),
                delivering: false,
            })),
        }
    }

    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription {
        self.register(None, callback)
    }

    /// Subscribe until `until` is cancelled.
    pub fn subscribe_until(
        &self,
        until: CancellationToken,
        callback: impl FnMut(&T) + 'static,
    ) -> Subscription {
        self.register(Some(until), callback)
    }

    fn register(
        &self,
        until: Option<CancellationToken>,
        callback: impl FnMut(&T) + 'static,
    ) -> Subscription {
        let active = Rc::new(Cell::new(true));
        let mut subscriber = Subscriber {
            active: Rc::clone(&active),
            until,
            callback: Box::new(callback),
        };

        let (completed, replay) = {
            let inner = self.inner.borrow();
            let replay = if inner.replay {
                inner.latest.clone()
            } else {
                None
            };
            (inner.completed, replay)
        };

        if completed {
            active.set(false);
            return Subscription { active };
        }

        if let Some(value) = replay {
            if subscriber.is_live() {
                (subscriber.callback)(&value);
            }
        }

        self.inner.borrow_mut().subscribers.push(subscriber);
        Subscription { active }
    }

    /// Deliver `value` to every live subscriber. Ignored once completed.
    ///
    /// Values emitted from inside a callback are queued and delivered, in
    /// order, once the current value has reached every subscriber.
    pub fn emit(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.completed {
                return;
            }
            inner.queued.push_back(value);
            if inner.delivering {
                return;
            }
            inner.delivering = true;
        }

        loop {
            // Take the list out so callbacks may subscribe, emit or complete.
            let (value, mut subscribers) = {
                let mut inner = self.inner.borrow_mut();
                let Some(value) = inner.queued.pop_front() else {
                    inner.delivering = false;
                    return;
                };
                inner.latest = Some(value.clone());
                (value, std::mem::take(&mut inner.subscribers))
            };

            for subscriber in subscribers.iter_mut() {
                if subscriber.is_live() {
                    (subscriber.callback)(&value);
                }
            }

            let mut inner = self.inner.borrow_mut();
            subscribers.append(&mut inner.subscribers);

            if inner.completed {
                for subscriber in &subscribers {
                    subscriber.active.set(false);
                }
                inner.queued.clear();
                inner.delivering = false;
                return;
            }

            subscribers.retain(Subscriber::is_live);
            inner.subscribers = subscribers;
        }
    }

    /// Latest delivered (or initial) value.
    pub fn latest(&self) -> Option<T> {
        self.inner.borrow().latest.clone()
    }

    /// End the stream and every subscription on it.
    pub fn complete(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.completed = true;
        inner.queued.clear();
        for subscriber in inner.subscribers.drain(..) {
            subscriber.active.set(false);
        }
    }

    pub fn is_completed(&self) -> bool {
        self.inner.borrow().completed
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|s| s.is_live())
            .count()
    }
}
