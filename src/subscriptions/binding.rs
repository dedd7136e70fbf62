//! Selector bindings over an entity.

use crate::entity::Entity;
use crate::types::{EntityId, State, SubscriberId};
use crossbeam_channel::{bounded, TrySendError};
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};
use tracing::warn;

use super::types::{Subscription, Watcher};

/// Derives a view of the state.
pub type Selector<T> = Arc<dyn Fn(&State) -> T + Send + Sync>;

/// An entity seen through a selector.
pub struct Binding<T> {
    entity: Arc<Entity>,
    selector: Selector<T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            entity: Arc::clone(&self.entity),
            selector: Arc::clone(&self.selector),
        }
    }
}

impl<T: 'static> Binding<T> {
    pub(crate) fn new(entity: Arc<Entity>, selector: Selector<T>) -> Self {
        Self { entity, selector }
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity.id()
    }

    /// Selected view of the current state.
    pub fn get_snapshot(&self) -> T {
        let state = self.entity.state();
        (self.selector)(&*state)
    }

    /// Call `callback` with the selected view after every update.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let selector = Arc::clone(&self.selector);
        let id = self
            .entity
            .subscribe(Arc::new(move |state: &State| callback(&selector(state))));
        Subscription::new(&self.entity, id)
    }
}

impl<T: Clone + PartialEq + Send + 'static> Binding<T> {
    /// Call `callback` only when the selected view differs from the last one
    /// this subscriber saw (initially the value at subscription time).
    pub fn subscribe_changes<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let selector = Arc::clone(&self.selector);
        let last = Mutex::new(self.get_snapshot());

        let id = self.entity.subscribe(Arc::new(move |state: &State| {
            let selected = selector(state);
            {
                let mut last = last.lock();
                if *last == selected {
                    return;
                }
                *last = selected.clone();
            }
            // Lock released: the callback may update the entity again.
            callback(&selected);
        }));
        Subscription::new(&self.entity, id)
    }
}

impl<T: Send + 'static> Binding<T> {
    /// Deliver the selected view of every update over a bounded channel.
    pub fn watch(&self, buffer_size: usize) -> Watcher<T> {
        let (sender, receiver) = bounded(buffer_size);
        let selector = Arc::clone(&self.selector);
        let entity = Arc::downgrade(&self.entity);
        let own_id: Arc<OnceLock<SubscriberId>> = Arc::new(OnceLock::new());
        let slot = Arc::clone(&own_id);

        let id = self.entity.subscribe(Arc::new(move |state: &State| {
            let reason = match sender.try_send(selector(state)) {
                Ok(()) => return,
                Err(TrySendError::Full(_)) => "buffer overflow",
                Err(TrySendError::Disconnected(_)) => "receiver dropped",
            };

            if let (Some(entity), Some(id)) = (entity.upgrade(), slot.get()) {
                if entity.unsubscribe(*id) {
                    warn!(entity = %entity.id(), reason, "dropping watcher");
                }
            }
        }));
        // An update racing in from another thread before this point finds no
        // id and leaves removal to the next failed send.
        own_id.get_or_init(|| id);

        Watcher {
            subscription: Subscription::new(&self.entity, id),
            receiver,
        }
    }
}
