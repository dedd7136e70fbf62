//! The entity record and its update engine.

use crate::actions::Actions;
use crate::error::{Result, StoreError};
use crate::state::{first_mismatch, merge_state};
use crate::types::{EntityId, EntityOptions, State, SubscriberId};
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace, warn};

use super::subscribers::{Subscriber, SubscriberList};

static NO_ACTIONS: Actions = Actions::empty();

/// One named unit of stored state.
pub struct Entity {
    id: EntityId,

    /// State supplied at creation. Never mutated; `reset` copies from it.
    initial_state: State,

    /// Current snapshot, replaced wholesale on every update.
    state: RwLock<Arc<State>>,

    options: EntityOptions,

    subscribers: Mutex<SubscriberList>,

    /// Bound once, right after construction.
    actions: OnceLock<Actions>,

    /// Serialises updates. Re-entrant so subscribers may update the entity
    /// they are being notified about.
    update_lock: ReentrantMutex<()>,
}

impl Entity {
    pub(crate) fn new(id: EntityId, initial_state: State, options: EntityOptions) -> Self {
        Self {
            id,
            state: RwLock::new(Arc::new(initial_state.clone())),
            initial_state,
            options,
            subscribers: Mutex::new(SubscriberList::new()),
            actions: OnceLock::new(),
            update_lock: ReentrantMutex::new(()),
        }
    }

    pub(crate) fn attach_actions(&self, actions: Actions) {
        self.actions.get_or_init(|| actions);
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Current state snapshot.
    pub fn state(&self) -> Arc<State> {
        Arc::clone(&self.state.read())
    }

    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    pub fn options(&self) -> &EntityOptions {
        &self.options
    }

    /// Bound actions. Empty until the owning store finishes binding.
    pub fn actions(&self) -> &Actions {
        self.actions.get().unwrap_or(&NO_ACTIONS)
    }

    /// Merge `updates` into the state and notify subscribers.
    ///
    /// With `schema_from_initial_state` set, every key of `updates` must match
    /// the shape of the same key in the current state; otherwise the call
    /// fails with [`StoreError::InvalidUpdate`] and nothing changes.
    pub fn set_state(&self, updates: State) -> Result<()> {
        let _guard = self.update_lock.lock();

        let next = {
            let current = self.state.read();
            if self.options.schema_from_initial_state {
                if let Some(key) = first_mismatch(&updates, &current) {
                    debug!(entity = %self.id, key, "rejected state update");
                    return Err(StoreError::InvalidUpdate {
                        entity: self.id,
                        key: key.to_string(),
                    });
                }
            }
            Arc::new(merge_state(&current, &updates))
        };

        *self.state.write() = next;
        self.notify();
        Ok(())
    }

    /// Compute updates from the current state and apply them under one hold
    /// of the update lock, so no other thread's update lands in between.
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&State) -> State,
    {
        let _guard = self.update_lock.lock();
        let current = self.state();
        let updates = f(&*current);
        self.set_state(updates)
    }

    /// Invoke a bound action with the update lock held for the whole call.
    ///
    /// Actions read the state and write it back; holding the lock makes that
    /// read-modify-write atomic with respect to other threads. The lock is
    /// re-entrant, so the action's own `set_state` calls still go through.
    /// An action must not block on another thread updating this entity.
    pub fn dispatch(&self, name: &str, payload: Value) -> Result<Value> {
        let _guard = self.update_lock.lock();
        self.actions().call(name, payload)
    }

    /// Like [`set_state`](Self::set_state), taking a JSON object.
    pub fn set_json(&self, updates: Value) -> Result<()> {
        let updates: State = serde_json::from_value(updates)?;
        self.set_state(updates)
    }

    /// Restore a fresh copy of the initial state. Subscribers are not notified.
    pub fn reset(&self) {
        let _guard = self.update_lock.lock();
        *self.state.write() = Arc::new(self.initial_state.clone());
        debug!(entity = %self.id, "state reset");
    }

    /// Append a subscriber. It is notified on every subsequent update.
    pub fn subscribe(&self, callback: Subscriber) -> SubscriberId {
        self.subscribers.lock().push(callback)
    }

    /// Clear a subscriber slot. Returns false if the id was not subscribed.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.subscribers.lock().clear(id)
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().live()
    }

    /// Number of subscriber slots, counting cleared slots not yet pruned.
    pub fn subscriber_slots(&self) -> usize {
        self.subscribers.lock().slots()
    }

    /// Notify every live subscriber in slot order, then prune.
    ///
    /// Slots are read by index from the live list and the list lock is
    /// released before each callback runs, so callbacks may subscribe,
    /// unsubscribe, or update this entity again.
    fn notify(&self) {
        let _pass = NotifyPass::begin(self);

        let mut index = 0;
        loop {
            let slot = self.subscribers.lock().callback_at(index);
            match slot {
                Some(Some(callback)) => {
                    let state = self.state();
                    self.invoke(&callback, &state);
                }
                Some(None) => {}
                None => break,
            }
            index += 1;
        }

        trace!(entity = %self.id, slots = index, "notification pass complete");
    }

    fn invoke(&self, callback: &Subscriber, state: &State) {
        if !self.options.isolate_subscriber_panics {
            callback(state);
            return;
        }

        if panic::catch_unwind(AssertUnwindSafe(|| callback(state))).is_err() {
            warn!(entity = %self.id, "subscriber panicked during notification");
        }
    }
}

/// Marks a notification pass as in flight. Prunes cleared slots when the
/// outermost pass ends, including on unwind.
struct NotifyPass<'a> {
    entity: &'a Entity,
}

impl<'a> NotifyPass<'a> {
    fn begin(entity: &'a Entity) -> Self {
        entity.subscribers.lock().begin_pass();
        Self { entity }
    }
}

impl Drop for NotifyPass<'_> {
    fn drop(&mut self) {
        let mut subscribers = self.entity.subscribers.lock();
        if subscribers.end_pass() {
            let pruned = subscribers.prune();
            if pruned > 0 {
                trace!(entity = %self.entity.id, pruned, "pruned cleared subscribers");
            }
        }
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("options", &self.options)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
