use crate::path::Resolved;
use crate::value::Value;

/// Whether a resolved value may be handed to a comparer alongside `literal`.
///
/// Tags must agree. A sequence passes only if every member passes, and an
/// array value standing in for a scalar passes only if every element does,
/// so one stray element fails the whole leaf whatever the fold.
pub fn type_matches(resolved: &Resolved, literal: &Value) -> bool {
    match resolved {
        Resolved::Absent => false,
        Resolved::One(v) => value_matches(v, literal),
        Resolved::Many(members) => members.iter().all(|m| type_matches(m, literal)),
    }
}

fn value_matches(v: &Value, literal: &Value) -> bool {
    if v.kind() == literal.kind() {
        return true;
    }
    match v {
        Value::Array(items) => items.iter().all(|item| value_matches(item, literal)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{resolve, Path};
    use serde_json::json;

    fn guard(doc: serde_json::Value, path: &str, literal: impl Into<Value>) -> bool {
        type_matches(&resolve(&doc, &Path::new(path)), &literal.into())
    }

    #[test]
    fn same_scalar_tags_pass() {
        assert!(guard(json!({"age": 42}), "age", 42_i64));
        assert!(guard(json!({"name": "stephen"}), "name", "stephen"));
        assert!(guard(json!({"isCool": false}), "isCool", false));
        assert!(guard(json!({"gone": null}), "gone", Value::Null));
    }

    #[test]
    fn different_scalar_tags_fail() {
        assert!(!guard(json!({"age": "42"}), "age", 42_i64));
        assert!(!guard(json!({"name": 42}), "name", "42"));
        assert!(!guard(json!({"isCool": 0}), "isCool", false));
        assert!(!guard(json!({"isCool": "true"}), "isCool", true));
        assert!(!guard(json!({"person": {"first": "a"}}), "person", "a"));
    }

    #[test]
    fn absent_fails() {
        assert!(!guard(json!({"isCool": "true"}), "foo", true));
    }

    #[test]
    fn every_member_must_match() {
        let ok = json!({"members": [{"age": 42}, {"age": 43}, {"age": 44}]});
        let bad = json!({"members": [{"age": 42}, {"age": 43}, {"age": "44"}]});
        assert!(guard(ok, "members.#.age", 42_i64));
        assert!(!guard(bad, "members.#.age", 42_i64));
    }

    #[test]
    fn nested_arrays_are_checked_elementwise() {
        let doc = json!({"friends": [{"episodes": [1, 2]}, {"episodes": [3]}]});
        assert!(guard(doc.clone(), "friends.#.episodes", 1_i64));
        assert!(!guard(doc, "friends.#.episodes", "1"));
        let mixed = json!({"friends": [{"episodes": [1, "2"]}]});
        assert!(!guard(mixed, "friends.#.episodes", 1_i64));
    }

    #[test]
    fn empty_sequence_passes() {
        assert!(guard(json!({"tags": []}), "tags", "x"));
    }
}
