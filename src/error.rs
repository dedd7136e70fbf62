//! Error types for the entity store.

use crate::types::EntityId;
use thiserror::Error;

/// Main error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid state update for entity {entity}: key '{key}' does not match state shape")]
    InvalidUpdate { entity: EntityId, key: String },

    #[error("Action '{0}' must be defined using a higher-order function")]
    MalformedAction(String),

    #[error("Action not found: {0}")]
    ActionNotFound(String),

    #[error("Entity identifiers exhausted")]
    IdentifiersExhausted,

    #[error("Entity already registered: {0}")]
    EntityExists(EntityId),

    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Entity {0} was dropped")]
    EntityDropped(EntityId),

    #[error("Invalid store definition: {0}")]
    InvalidDefinition(String),

    #[error("Action failed: {0}")]
    Action(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
