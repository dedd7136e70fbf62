//! Action binding.
//!
//! Actions are declared as higher-order functions: a factory receives the
//! entity handle and the injected dependencies and returns the callable that
//! consumers invoke. Binding runs every factory once, at store creation.

use crate::entity::EntityHandle;
use crate::error::{Result, StoreError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A bound action: JSON payload in, JSON result out.
pub type Action = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// Produces an [`Action`] closed over one entity and its dependencies.
/// Returning `None` means the factory did not yield a callable.
pub type ActionFactory<D> = Box<dyn Fn(EntityHandle, Arc<D>) -> Option<Action> + Send + Sync>;

/// Wrap a closure as an [`Action`].
pub fn action<F>(f: F) -> Action
where
    F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Bound actions of one entity, by name.
#[derive(Clone, Default)]
pub struct Actions {
    actions: BTreeMap<String, Action>,
}

impl Actions {
    pub const fn empty() -> Self {
        Self {
            actions: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Invoke the action registered under `name`.
    ///
    /// This does not take the entity's update lock; use
    /// [`Store::dispatch`](crate::Store::dispatch) when other threads may
    /// update the same entity.
    pub fn call(&self, name: &str, payload: Value) -> Result<Value> {
        let action = self
            .actions
            .get(name)
            .ok_or_else(|| StoreError::ActionNotFound(name.to_string()))?;
        action(payload)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Debug for Actions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.actions.keys()).finish()
    }
}

/// Run every factory against `handle` and `deps`.
///
/// Fails with [`StoreError::MalformedAction`] on the first factory that does
/// not yield an action; nothing is returned in that case.
pub fn bind_actions<D>(
    factories: &BTreeMap<String, ActionFactory<D>>,
    handle: &EntityHandle,
    deps: &Arc<D>,
) -> Result<Actions> {
    let mut actions = BTreeMap::new();

    for (name, factory) in factories {
        let action = factory(handle.clone(), Arc::clone(deps))
            .ok_or_else(|| StoreError::MalformedAction(name.clone()))?;
        actions.insert(name.clone(), action);
    }

    Ok(Actions { actions })
}
