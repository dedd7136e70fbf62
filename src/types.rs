//! Core types for the entity store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A state snapshot: string keys mapped to arbitrary JSON values.
pub type State = serde_json::Map<String, serde_json::Value>;

/// Unique identifier for an entity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a subscriber slot within one entity.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

impl fmt::Debug for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriberId({})", self.0)
    }
}

/// Per-entity configuration.
///
/// Deserializes from the camelCase keys used in JSON store definitions,
/// e.g. `{"schemaFromInitialState": true}`. Missing keys default to `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityOptions {
    /// Reject updates whose values do not match the shape of the state.
    pub schema_from_initial_state: bool,

    /// Catch subscriber panics so the remaining subscribers still run.
    pub isolate_subscriber_panics: bool,
}

impl EntityOptions {
    /// Options with shape validation turned on.
    pub fn validated() -> Self {
        Self {
            schema_from_initial_state: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_options_from_camel_case() {
        let options: EntityOptions =
            serde_json::from_value(json!({"schemaFromInitialState": true})).unwrap();
        assert!(options.schema_from_initial_state);
        assert!(!options.isolate_subscriber_panics);
    }

    #[test]
    fn test_options_default_when_empty() {
        let options: EntityOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options, EntityOptions::default());
    }
}
