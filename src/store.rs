//! Store definitions and the store façade.

use crate::actions::{bind_actions, Action, ActionFactory, Actions};
use crate::entity::{Entity, EntityHandle};
use crate::error::{Result, StoreError};
use crate::registry::Registry;
use crate::subscriptions::Binding;
use crate::types::{EntityId, EntityOptions, State};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Everything needed to create a store: initial state, options and the
/// action factories, kept in separate fields.
pub struct StoreDefinition<D> {
    /// Initial state. `None` starts from an empty mapping.
    pub initial_state: Option<State>,

    /// Entity options.
    pub options: EntityOptions,

    actions: BTreeMap<String, ActionFactory<D>>,
}

/// JSON form of the non-action part of a definition.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefinitionConfig {
    #[serde(default)]
    initial_state: Option<Value>,
    #[serde(default)]
    options: EntityOptions,
}

impl<D> StoreDefinition<D> {
    pub fn new() -> Self {
        Self {
            initial_state: None,
            options: EntityOptions::default(),
            actions: BTreeMap::new(),
        }
    }

    /// Read `initialState` and `options` from a JSON configuration object.
    /// Other keys are ignored; actions are added with [`action`](Self::action).
    pub fn from_json(config: Value) -> Result<Self> {
        let config: DefinitionConfig = serde_json::from_value(config)?;

        let initial_state = match config.initial_state {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                return Err(StoreError::InvalidDefinition(format!(
                    "initialState must be an object, got {}",
                    other
                )))
            }
        };

        Ok(Self {
            initial_state,
            options: config.options,
            actions: BTreeMap::new(),
        })
    }

    pub fn initial_state(mut self, state: State) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn options(mut self, options: EntityOptions) -> Self {
        self.options = options;
        self
    }

    /// Add an action factory. A later factory with the same name replaces
    /// the earlier one.
    pub fn action<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(EntityHandle, Arc<D>) -> Option<Action> + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Box::new(factory));
        self
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }
}

impl<D> Default for StoreDefinition<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Public handle to one registered entity.
///
/// Consumers mutate state through [`dispatch`](Self::dispatch) and observe it
/// through a [`Binding`] obtained from [`select`](Self::select).
#[derive(Clone, Debug)]
pub struct Store {
    entity: Arc<Entity>,
}

impl Store {
    /// Reserve an id, build the entity, bind its actions, then register it.
    /// Nothing is registered if any action fails to bind.
    pub(crate) fn create<D>(
        registry: &Registry,
        definition: StoreDefinition<D>,
        deps: D,
    ) -> Result<Self>
    where
        D: Send + Sync + 'static,
    {
        let StoreDefinition {
            initial_state,
            options,
            actions: factories,
        } = definition;

        let id = registry.reserve_identifier()?;
        let entity = Arc::new(Entity::new(id, initial_state.unwrap_or_default(), options));

        let actions = bind_actions(&factories, &EntityHandle::new(&entity), &Arc::new(deps))?;
        let action_count = actions.len();
        entity.attach_actions(actions);

        registry.register(Arc::clone(&entity))?;
        debug!(entity = %id, actions = action_count, "created store");

        Ok(Self { entity })
    }

    pub fn id(&self) -> EntityId {
        self.entity.id()
    }

    pub fn entity(&self) -> &Arc<Entity> {
        &self.entity
    }

    /// Current state snapshot.
    pub fn state(&self) -> Arc<State> {
        self.entity.state()
    }

    pub fn actions(&self) -> &Actions {
        self.entity.actions()
    }

    /// Invoke a bound action by name, atomically with respect to other
    /// updates of this entity. See [`Entity::dispatch`].
    pub fn dispatch(&self, name: &str, payload: Value) -> Result<Value> {
        self.entity.dispatch(name, payload)
    }

    pub fn reset(&self) {
        self.entity.reset()
    }

    /// Binding that exposes the whole state.
    pub fn binding(&self) -> Binding<State> {
        self.select(|state: &State| state.clone())
    }

    /// Binding that exposes `selector(state)`.
    pub fn select<T, F>(&self, selector: F) -> Binding<T>
    where
        T: 'static,
        F: Fn(&State) -> T + Send + Sync + 'static,
    {
        Binding::new(Arc::clone(&self.entity), Arc::new(selector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::action;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let definition: StoreDefinition<()> = StoreDefinition::from_json(json!({
            "initialState": {"name": "a"},
            "options": {"schemaFromInitialState": true},
            "someAction": "ignored"
        }))
        .unwrap();

        assert_eq!(definition.initial_state.unwrap()["name"], "a");
        assert!(definition.options.schema_from_initial_state);
    }

    #[test]
    fn test_from_json_rejects_non_object_state() {
        let result = StoreDefinition::<()>::from_json(json!({"initialState": [1, 2]}));
        assert!(matches!(result, Err(StoreError::InvalidDefinition(_))));
    }

    #[test]
    fn test_from_json_empty() {
        let definition = StoreDefinition::<()>::from_json(json!({})).unwrap();
        assert!(definition.initial_state.is_none());
        assert_eq!(definition.options, EntityOptions::default());
    }

    #[test]
    fn test_create_without_initial_state() {
        let registry = Registry::new();
        let store = registry.create_store(StoreDefinition::new(), ()).unwrap();
        assert!(store.state().is_empty());
        assert!(registry.contains(store.id()));
    }

    #[test]
    fn test_malformed_action_not_registered() {
        let registry = Registry::new();
        let definition = StoreDefinition::new()
            .action("ok", |_, _: Arc<()>| Some(action(|_| Ok(Value::Null))))
            .action("bad", |_, _: Arc<()>| None);

        let result = registry.create_store(definition, ());
        assert!(matches!(result, Err(StoreError::MalformedAction(ref name)) if name == "bad"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dispatch() {
        let registry = Registry::new();
        let definition = StoreDefinition::new()
            .initial_state(serde_json::from_value(json!({"value": ""})).unwrap())
            .action("set", |entity: EntityHandle, _: Arc<()>| {
                Some(action(move |payload| {
                    entity.set_json(json!({"value": payload}))?;
                    Ok(Value::Null)
                }))
            });

        let store = registry.create_store(definition, ()).unwrap();
        store.dispatch("set", json!("hello")).unwrap();
        assert_eq!(store.state()["value"], "hello");
        assert!(matches!(
            store.dispatch("missing", Value::Null),
            Err(StoreError::ActionNotFound(_))
        ));
    }
}
