//! # Entity Store
//!
//! An in-process reactive state container. Each entity holds a JSON state
//! mapping, a list of subscribers, and a set of bound actions that mutate it.
//!
//! ## Core Concepts
//!
//! - **Registry**: Owns entities and hands out their identifiers
//! - **Entities**: State snapshot, subscriber slots, options and actions
//! - **Actions**: Higher-order functions bound to one entity and its dependencies
//! - **Bindings**: Selector views that rendering adapters subscribe to
//!
//! ## Example
//!
//! ```ignore
//! use entity_store::{action, Registry, StoreDefinition};
//!
//! let registry = Registry::new();
//! let store = registry.create_store(
//!     StoreDefinition::from_json(json!({"initialState": {"count": 0}}))?
//!         .action("increment", |entity, _deps| {
//!             Some(action(move |_| {
//!                 let count = entity.state()?["count"].as_i64().unwrap_or(0);
//!                 entity.set_json(json!({"count": count + 1}))?;
//!                 Ok(Value::Null)
//!             }))
//!         }),
//!     (),
//! )?;
//!
//! let count = store.select(|state| state["count"].clone());
//! count.subscribe(|count| println!("count: {}", count));
//!
//! store.dispatch("increment", Value::Null)?;
//! ```

pub mod actions;
pub mod entity;
pub mod error;
pub mod registry;
pub mod state;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use actions::{action, bind_actions, Action, ActionFactory, Actions};
pub use entity::{Entity, EntityHandle, Subscriber};
pub use error::{Result, StoreError};
pub use registry::{Registry, RegistryConfig};
pub use state::{matches_shape, merge_state};
pub use store::{Store, StoreDefinition};
pub use subscriptions::{Binding, Selector, Subscription, Watcher};
pub use types::*;
