//! Pure state transitions.
//!
//! The update engine in [`crate::entity`] composes these: an optional shape
//! check followed by a shallow merge that produces the next snapshot.

mod operations;
mod shape;

pub use operations::merge_state;
pub use shape::{first_mismatch, matches_shape, ShapeTag};
