//! Subscription handles.

use crate::entity::Entity;
use crate::types::{EntityId, SubscriberId};
use crossbeam_channel::{Receiver, RecvError, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Weak};
use std::time::Duration;

/// A registered subscriber. Call [`unsubscribe`](Self::unsubscribe) to stop
/// notifications; dropping the handle leaves the subscriber in place.
#[derive(Debug)]
pub struct Subscription {
    entity_id: EntityId,
    id: SubscriberId,
    entity: Weak<Entity>,
}

impl Subscription {
    pub(crate) fn new(entity: &Arc<Entity>, id: SubscriberId) -> Self {
        Self {
            entity_id: entity.id(),
            id,
            entity: Arc::downgrade(entity),
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn entity_id(&self) -> EntityId {
        self.entity_id
    }

    /// Clear this subscriber's slot. Returns false if it was already gone.
    pub fn unsubscribe(self) -> bool {
        self.entity
            .upgrade()
            .map(|entity| entity.unsubscribe(self.id))
            .unwrap_or(false)
    }
}

/// Channel-backed subscription.
///
/// Receives one selected value per update. If the buffer fills up or the
/// watcher is dropped, the subscriber removes itself on the next update.
pub struct Watcher<T> {
    pub(crate) subscription: Subscription,
    pub(crate) receiver: Receiver<T>,
}

impl<T> Watcher<T> {
    pub fn subscription_id(&self) -> SubscriberId {
        self.subscription.id()
    }

    /// Receive the next value (blocking).
    pub fn recv(&self) -> Result<T, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a value (non-blocking).
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<T, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain every value currently buffered.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    pub fn unsubscribe(self) -> bool {
        self.subscription.unsubscribe()
    }
}
