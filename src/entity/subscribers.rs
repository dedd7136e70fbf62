//! Subscriber slots with stable positions.

use crate::types::{State, SubscriberId};
use std::sync::Arc;

/// A notification callback. Receives the entity's state after an update.
pub type Subscriber = Arc<dyn Fn(&State) + Send + Sync>;

struct Slot {
    id: SubscriberId,
    callback: Subscriber,
}

/// Ordered subscriber slots.
///
/// A cleared slot stays in place while any notification pass is running and
/// is removed by [`SubscriberList::prune`] once the outermost pass ends.
pub(crate) struct SubscriberList {
    slots: Vec<Option<Slot>>,
    next_id: u64,
    /// Number of notification passes currently in flight (nested passes
    /// come from re-entrant updates made by subscribers).
    passes: usize,
}

impl SubscriberList {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 1,
            passes: 0,
        }
    }

    /// Append a subscriber at the end of the sequence.
    pub fn push(&mut self, callback: Subscriber) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.slots.push(Some(Slot { id, callback }));
        id
    }

    /// Clear the slot holding `id`. Outside a notification pass the slot is
    /// removed right away. Returns false if no live slot has that id.
    pub fn clear(&mut self, id: SubscriberId) -> bool {
        let Some(index) = self
            .slots
            .iter()
            .position(|slot| matches!(slot, Some(s) if s.id == id))
        else {
            return false;
        };

        if self.passes == 0 {
            self.slots.remove(index);
        } else {
            self.slots[index] = None;
        }
        true
    }

    /// Callback at `index`. The outer `None` means past the end; the inner
    /// `None` is a cleared slot.
    pub fn callback_at(&self, index: usize) -> Option<Option<Subscriber>> {
        self.slots
            .get(index)
            .map(|slot| slot.as_ref().map(|s| Arc::clone(&s.callback)))
    }

    pub fn begin_pass(&mut self) {
        self.passes += 1;
    }

    /// Finish a notification pass. Returns true if it was the outermost one.
    pub fn end_pass(&mut self) -> bool {
        self.passes = self.passes.saturating_sub(1);
        self.passes == 0
    }

    /// Drop every cleared slot. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.slots.len();
        self.slots.retain(Option::is_some);
        before - self.slots.len()
    }

    /// Number of live subscribers.
    pub fn live(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Number of slots, including cleared ones awaiting pruning.
    pub fn slots(&self) -> usize {
        self.slots.len()
    }
}
