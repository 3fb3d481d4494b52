//! Subscriber registry
//!
//! Callbacks are kept in registration order and invoked synchronously.
//! A callback must not mutate the store that is notifying it.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use super::store::Snapshot;

type Callback = Rc<RefCell<dyn FnMut(&Snapshot)>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    callbacks: BTreeMap<u64, Callback>,
}

/// Ordered set of snapshot callbacks
#[derive(Default)]
pub(crate) struct Listeners {
    registry: Rc<RefCell<Registry>>,
}

impl Listeners {
    /// Register a callback and deliver `initial` to it immediately
    pub fn subscribe<F>(&self, callback: F, initial: &Snapshot) -> Subscription
    where
        F: FnMut(&Snapshot) + 'static,
    {
        let callback: Callback = Rc::new(RefCell::new(callback));
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.callbacks.insert(id, Rc::clone(&callback));
            id
        };

        (&mut *callback.borrow_mut())(initial);

        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
            disposed: Cell::new(false),
        }
    }

    /// Deliver `snapshot` to every live callback
    pub fn notify(&self, snapshot: &Snapshot) {
        let callbacks: Vec<(u64, Callback)> = self
            .registry
            .borrow()
            .callbacks
            .iter()
            .map(|(id, cb)| (*id, Rc::clone(cb)))
            .collect();

        for (id, callback) in callbacks {
            // disposed by an earlier callback in this round
            if !self.registry.borrow().callbacks.contains_key(&id) {
                continue;
            }
            (&mut *callback.borrow_mut())(snapshot);
        }
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.registry.borrow().callbacks.len()
    }
}

/// Handle returned by `subscribe`
///
/// Dropping the handle does not unsubscribe; call [`Subscription::dispose`].
#[must_use = "keep the subscription to be able to dispose it"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
    disposed: Cell<bool>,
}

impl Subscription {
    /// Deregister the callback; later calls are no-ops
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().callbacks.remove(&self.id);
        }
    }

    /// Whether the callback is still registered
    pub fn is_active(&self) -> bool {
        !self.disposed.get() && self.registry.strong_count() > 0
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
