//! Entity registry: identifier reservation and the id → entity mapping.

use crate::entity::Entity;
use crate::error::{Result, StoreError};
use crate::store::{Store, StoreDefinition};
use crate::types::EntityId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Registry configuration.
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// First identifier handed out by `reserve_identifier`.
    pub first_id: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { first_id: 1 }
    }
}

/// Owns every entity created through it.
///
/// Entities are added as stores are created and live as long as the
/// registry does; there is no per-entity removal.
pub struct Registry {
    entities: RwLock<HashMap<EntityId, Arc<Entity>>>,
    next_id: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(config.first_id),
        }
    }

    /// Hand out a fresh identifier. Never repeats for this registry.
    ///
    /// Ids increase strictly; once the counter would pass `u64::MAX` the
    /// registry fails with `IdentifiersExhausted` instead of wrapping.
    pub fn reserve_identifier(&self) -> Result<EntityId> {
        self.next_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |id| id.checked_add(1))
            .map(EntityId)
            .map_err(|_| StoreError::IdentifiersExhausted)
    }

    /// Insert `entity` under its id.
    pub fn register(&self, entity: Arc<Entity>) -> Result<()> {
        let id = entity.id();
        let mut entities = self.entities.write();
        if entities.contains_key(&id) {
            return Err(StoreError::EntityExists(id));
        }
        entities.insert(id, entity);
        debug!(entity = %id, "registered entity");
        Ok(())
    }

    /// Create an entity from `definition`, bind its actions and register it.
    pub fn create_store<D>(&self, definition: StoreDefinition<D>, deps: D) -> Result<Store>
    where
        D: Send + Sync + 'static,
    {
        Store::create(self, definition, deps)
    }

    pub fn get(&self, id: EntityId) -> Option<Arc<Entity>> {
        self.entities.read().get(&id).cloned()
    }

    /// Like [`get`](Self::get), failing with `EntityNotFound`.
    pub fn entity(&self, id: EntityId) -> Result<Arc<Entity>> {
        self.get(id).ok_or(StoreError::EntityNotFound(id))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.read().contains_key(&id)
    }

    /// Registered ids in ascending order.
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.entities.read().keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
