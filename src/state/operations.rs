//! State merge.

use crate::types::State;

/// Shallow-merge `updates` over `state`, producing a new snapshot.
///
/// Keys in `updates` overwrite same-named keys; every other key of `state`
/// is carried over unchanged. Neither input is modified.
pub fn merge_state(state: &State, updates: &State) -> State {
    let mut next = state.clone();
    for (key, value) in updates {
        next.insert(key.clone(), value.clone());
    }
    next
}
