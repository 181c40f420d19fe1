//! Synchronous change notification.
//!
//! A [`ChangeNotifier`] fans a payload out to every registered callback, in
//! subscription order, before [`ChangeNotifier::publish`] returns. Every
//! mutable entity of the model (vertices, faces, the model itself and the
//! selection) owns one.
//!
//! Subscribing hands back a [`Subscription`] guard. Dropping the guard removes
//! the callback, so a subscriber that goes away cannot keep receiving
//! notifications from an entity that outlives it.
//!
//! Delivery is reentrant: a callback may subscribe, unsubscribe or trigger a
//! nested `publish`. The subscriber list is snapshotted before delivery, so
//! such changes take effect from the next `publish` on.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Identifies one registration on a [`ChangeNotifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback<T> = Rc<dyn Fn(&T)>;

/// Type-erased view of a subscriber list, used by guards that must not carry
/// the payload type.
trait SubscriberList {
    fn remove(&self, id: SubscriptionId) -> bool;
    fn resume(&self);
}

struct Subscribers<T> {
    next_id: Cell<u64>,
    suspended: Cell<u32>,
    entries: RefCell<Vec<(SubscriptionId, Callback<T>)>>,
}

impl<T> SubscriberList for Subscribers<T> {
    fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.borrow_mut();
        match entries.iter().position(|(entry_id, _)| *entry_id == id) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    fn resume(&self) {
        self.suspended.set(self.suspended.get().saturating_sub(1));
    }
}

/// A synchronous publish/subscribe primitive.
///
/// Callbacks run on the publishing thread, in the order they subscribed. A
/// panicking callback unwinds through `publish` to its caller; callbacks
/// after it in the snapshot do not run.
pub struct ChangeNotifier<T> {
    subscribers: Rc<Subscribers<T>>,
}

impl<T: 'static> ChangeNotifier<T> {
    /// Creates a notifier with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(Subscribers {
                next_id: Cell::new(1),
                suspended: Cell::new(0),
                entries: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Registers a callback.
    ///
    /// The callback stays registered for as long as the returned guard is
    /// alive (or forever, after [`Subscription::detach`]).
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let id = SubscriptionId(self.subscribers.next_id.get());
        self.subscribers.next_id.set(id.0 + 1);
        self.subscribers
            .entries
            .borrow_mut()
            .push((id, Rc::new(callback)));

        let list = Rc::downgrade(&self.subscribers);
        let list: Weak<dyn SubscriberList> = list;
        Subscription {
            id,
            list: Some(list),
        }
    }

    /// Removes a registration by id.
    ///
    /// Returns `false` if no callback with that id is registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    /// Delivers `payload` to every currently registered callback.
    ///
    /// Does nothing while a [`Suspension`] is alive.
    pub fn publish(&self, payload: &T) {
        if self.is_suspended() {
            return;
        }

        let snapshot: Vec<Callback<T>> = self
            .subscribers
            .entries
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        for callback in snapshot {
            callback(payload);
        }
    }

    /// Mutes this notifier until the returned guard is dropped.
    ///
    /// Suspensions nest: publishing resumes once every guard is gone.
    /// Notifications published while muted are dropped, not queued.
    pub fn suspend(&self) -> Suspension {
        self.subscribers
            .suspended
            .set(self.subscribers.suspended.get() + 1);
        let list = Rc::downgrade(&self.subscribers);
        let list: Weak<dyn SubscriberList> = list;
        Suspension { list }
    }

    /// Returns whether at least one [`Suspension`] is alive.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.subscribers.suspended.get() > 0
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.entries.borrow().len()
    }
}

impl<T: 'static> Default for ChangeNotifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ChangeNotifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscribers.entries.borrow().len())
            .field("suspended", &self.subscribers.suspended.get())
            .finish()
    }
}

/// Guard for one registration on a [`ChangeNotifier`].
///
/// Dropping it unsubscribes the callback. The guard only holds a weak link to
/// the notifier, so it never keeps the publishing entity alive.
#[must_use = "dropping a Subscription unsubscribes its callback"]
pub struct Subscription {
    id: SubscriptionId,
    list: Option<Weak<dyn SubscriberList>>,
}

impl Subscription {
    /// Returns the id of the registration this guard owns.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Unsubscribes now.
    ///
    /// Returns `false` if the notifier is gone or the callback was already
    /// removed through [`ChangeNotifier::unsubscribe`].
    pub fn release(mut self) -> bool {
        self.remove()
    }

    /// Gives up the guard, leaving the callback registered.
    ///
    /// The returned id can still be passed to [`ChangeNotifier::unsubscribe`].
    pub fn detach(mut self) -> SubscriptionId {
        self.list = None;
        self.id
    }

    fn remove(&mut self) -> bool {
        self.list
            .take()
            .and_then(|list| list.upgrade())
            .is_some_and(|list| list.remove(self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.list.is_some())
            .finish()
    }
}

/// Guard returned by [`ChangeNotifier::suspend`].
#[must_use = "the notifier resumes as soon as the Suspension is dropped"]
pub struct Suspension {
    list: Weak<dyn SubscriberList>,
}

impl Drop for Suspension {
    fn drop(&mut self) {
        if let Some(list) = self.list.upgrade() {
            list.resume();
        }
    }
}

impl fmt::Debug for Suspension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suspension").finish_non_exhaustive()
    }
}
