//! Subscription façade used by rendering adapters.
//!
//! A [`Binding`] pairs an entity with a selector. Adapters read the selected
//! view with [`Binding::get_snapshot`] and register a re-render callback
//! with one of:
//! - [`Binding::subscribe`]: called on every update
//! - [`Binding::subscribe_changes`]: called only when the selected value changes
//! - [`Binding::watch`]: selected values delivered over a bounded channel
//!
//! # Example
//!
//! ```ignore
//! let registry = Registry::new();
//! let store = registry.create_store(definition, ())?;
//!
//! let count = store.select(|state| state["count"].as_i64().unwrap_or(0));
//! let subscription = count.subscribe_changes(|count| println!("count is now {}", count));
//!
//! store.dispatch("increment", Value::Null)?;
//! subscription.unsubscribe();
//! ```

mod binding;
mod types;

pub use binding::{Binding, Selector};
pub use types::{Subscription, Watcher};
