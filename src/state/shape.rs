//! Shallow shape validation.
//!
//! Only the type tag of each updated key is compared, plus whether
//! composite values are sequences. Nested contents are never inspected.

use crate::types::State;
use serde_json::Value;

/// Coarse type of a JSON value as seen by the shape check.
///
/// `null` shares the non-sequence composite tag with objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeTag {
    Boolean,
    Number,
    String,
    Composite { sequence: bool },
}

impl ShapeTag {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Bool(_) => ShapeTag::Boolean,
            Value::Number(_) => ShapeTag::Number,
            Value::String(_) => ShapeTag::String,
            Value::Array(_) => ShapeTag::Composite { sequence: true },
            Value::Null | Value::Object(_) => ShapeTag::Composite { sequence: false },
        }
    }
}

/// Return the first key of `updates` whose value does not match `pattern`.
///
/// A key missing from `pattern` is a mismatch.
pub fn first_mismatch<'a>(updates: &'a State, pattern: &State) -> Option<&'a str> {
    updates
        .iter()
        .find(|(key, value)| match pattern.get(key.as_str()) {
            Some(expected) => ShapeTag::of(value) != ShapeTag::of(expected),
            None => true,
        })
        .map(|(key, _)| key.as_str())
}

/// Check that every key of `updates` matches the shape of `pattern`.
pub fn matches_shape(updates: &State, pattern: &State) -> bool {
    first_mismatch(updates, pattern).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> State {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_same_primitive_types_match() {
        let pattern = map(json!({"name": "a", "count": 1, "on": false}));
        let updates = map(json!({"name": "b", "count": 2.5, "on": true}));
        assert!(matches_shape(&updates, &pattern));
    }

    #[test]
    fn test_type_change_rejected() {
        let pattern = map(json!({"name": "a"}));
        let updates = map(json!({"name": 5}));
        assert!(!matches_shape(&updates, &pattern));
        assert_eq!(first_mismatch(&updates, &pattern), Some("name"));
    }

    #[test]
    fn test_array_vs_object_rejected() {
        let pattern = map(json!({"items": [], "meta": {}}));

        assert!(!matches_shape(&map(json!({"items": {}})), &pattern));
        assert!(!matches_shape(&map(json!({"meta": [1]})), &pattern));
        assert!(matches_shape(&map(json!({"items": [1, "x"], "meta": {"k": 1}})), &pattern));
    }

    #[test]
    fn test_nested_contents_not_checked() {
        let pattern = map(json!({"user": {"name": "a"}}));
        let updates = map(json!({"user": {"name": 1, "extra": []}}));
        assert!(matches_shape(&updates, &pattern));
    }

    #[test]
    fn test_null_is_non_sequence_composite() {
        let pattern = map(json!({"selected": null, "list": [1]}));
        assert!(matches_shape(&map(json!({"selected": {"id": 1}})), &pattern));
        assert!(!matches_shape(&map(json!({"list": null})), &pattern));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let pattern = map(json!({"a": 1}));
        assert_eq!(first_mismatch(&map(json!({"b": 1})), &pattern), Some("b"));
    }

    #[test]
    fn test_absent_keys_ignored() {
        let pattern = map(json!({"a": 1, "b": "x"}));
        assert!(matches_shape(&State::new(), &pattern));
        assert!(matches_shape(&map(json!({"b": "y"})), &pattern));
    }
}
