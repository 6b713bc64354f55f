use crate::value::Value;
use std::cmp::Ordering;

/// Numeric ordering between two values. Only numbers are ordered; every
/// other pairing, and NaN, yields `None` so ordering comparers fail closed.
pub fn numeric_order(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(na), Value::Number(nb)) => na.partial_cmp(nb),
        _ => None,
    }
}

/// Apply `pred` to the numeric ordering of `a` against `b`.
pub fn cmp_numbers<F>(a: &Value, b: &Value, pred: F) -> bool
where
    F: Fn(Ordering) -> bool,
{
    numeric_order(a, b).map(pred).unwrap_or(false)
}

/// `a` contains `b` when `a` is an array with an element equal to `b`, or a
/// string with `b` as a substring.
pub fn contains(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Array(items), needle) => items.iter().any(|item| item == needle),
        (Value::String(hay), Value::String(needle)) => hay.contains(needle.as_str()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_numbers_are_ordered() {
        assert_eq!(
            numeric_order(&Value::from(22_i64), &Value::from(20_i64)),
            Some(Ordering::Greater)
        );
        assert_eq!(numeric_order(&Value::from("b"), &Value::from("a")), None);
        assert_eq!(numeric_order(&Value::from(1_i64), &Value::from("1")), None);
        assert_eq!(numeric_order(&Value::Number(f64::NAN), &Value::from(1_i64)), None);
    }

    #[test]
    fn contains_array_and_substring() {
        let episodes = Value::from(json!([1, 2, 3]));
        assert!(contains(&episodes, &Value::from(1_i64)));
        assert!(!contains(&episodes, &Value::from("1")));
        assert!(contains(&Value::from("skywalker"), &Value::from("walk")));
        assert!(!contains(&Value::from("skywalker"), &Value::from("Walk")));
        assert!(!contains(&Value::from(12_i64), &Value::from(1_i64)));
    }
}
