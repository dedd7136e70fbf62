//! Entities: one unit of stored state plus its subscribers and actions.
//!
//! All state changes go through [`Entity::set_state`], which runs the
//! update in three steps while holding the entity's update lock:
//!
//! 1. Optional shape validation of the update against the current state
//! 2. Shallow merge and atomic replacement of the snapshot
//! 3. Notification of every live subscriber, followed by a prune pass
//!    that removes slots cleared during notification
//!
//! Subscriber slots are never removed while a notification pass is running,
//! so a subscriber that unsubscribes itself (or another subscriber) cannot
//! cause a later subscriber to be skipped.

mod handle;
mod record;
mod subscribers;

pub use handle::EntityHandle;
pub use record::Entity;
pub use subscribers::Subscriber;
