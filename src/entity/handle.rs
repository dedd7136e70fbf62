//! Weak entity references handed to action factories.

use crate::error::{Result, StoreError};
use crate::types::{EntityId, State};
use serde_json::Value;
use std::sync::{Arc, Weak};

use super::record::Entity;

/// A non-owning reference to an entity.
///
/// Actions are stored on the entity they mutate, so they capture this
/// handle rather than an `Arc<Entity>` to avoid a reference cycle.
#[derive(Clone, Debug)]
pub struct EntityHandle {
    id: EntityId,
    entity: Weak<Entity>,
}

impl EntityHandle {
    pub fn new(entity: &Arc<Entity>) -> Self {
        Self {
            id: entity.id(),
            entity: Arc::downgrade(entity),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Upgrade to a strong reference.
    pub fn entity(&self) -> Result<Arc<Entity>> {
        self.entity.upgrade().ok_or(StoreError::EntityDropped(self.id))
    }

    /// Current state snapshot.
    pub fn state(&self) -> Result<Arc<State>> {
        Ok(self.entity()?.state())
    }

    pub fn set_state(&self, updates: State) -> Result<()> {
        self.entity()?.set_state(updates)
    }

    /// Atomic read-modify-write, see [`Entity::update`].
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&State) -> State,
    {
        self.entity()?.update(f)
    }

    pub fn set_json(&self, updates: Value) -> Result<()> {
        self.entity()?.set_json(updates)
    }

    pub fn reset(&self) -> Result<()> {
        self.entity()?.reset();
        Ok(())
    }
}
