use crate::comparers::{Compare, Lookup, Registry};
use crate::guard::type_matches;
use crate::path::{resolve, Resolved};
use crate::rule::{Leaf, Operator, Rule};
use crate::value::Value;
use serde_json::Value as Json;

/// Fold booleans with `op`, stopping as soon as the outcome is fixed.
/// An empty input is `true` under `And` and `false` under `Or`;
/// `Unknown` is always `false`.
pub fn fold<I>(op: Operator, items: I) -> bool
where
    I: IntoIterator<Item = bool>,
{
    let mut items = items.into_iter();
    match op {
        Operator::And => items.all(|b| b),
        Operator::Or => items.any(|b| b),
        Operator::Unknown => false,
    }
}

/// Apply `comparer` to every value against `literal` and fold with `op`.
pub fn broadcast<'a, I>(values: I, literal: &Value, comparer: &dyn Compare, op: Operator) -> bool
where
    I: IntoIterator<Item = &'a Value>,
{
    fold(op, values.into_iter().map(|v| comparer.compare(v, literal)))
}

// Nested sequences come from repeated wildcards; each level folds with the
// same operator.
fn fan_out(members: &[Resolved], literal: &Value, comparer: &dyn Compare, op: Operator) -> bool {
    if let Some(values) = flat_values(members) {
        return broadcast(values, literal, comparer, op);
    }
    fold(
        op,
        members.iter().map(|m| match m {
            Resolved::One(v) => comparer.compare(v, literal),
            Resolved::Many(inner) => fan_out(inner, literal, comparer, op),
            Resolved::Absent => false,
        }),
    )
}

fn flat_values(members: &[Resolved]) -> Option<Vec<&Value>> {
    members
        .iter()
        .map(|m| match m {
            Resolved::One(v) => Some(v),
            _ => None,
        })
        .collect()
}

/// Evaluate a rule tree against a parsed document.
pub fn evaluate_rule(rule: &Rule, document: &Json, registry: &Registry) -> bool {
    match rule {
        Rule::Composite { operator, rules } => fold(
            *operator,
            rules.iter().map(|child| evaluate_rule(child, document, registry)),
        ),
        Rule::Leaf(leaf) => evaluate_leaf(leaf, document, registry),
    }
}

fn evaluate_leaf(leaf: &Leaf, document: &Json, registry: &Registry) -> bool {
    if leaf.operator == Operator::Unknown {
        tracing::debug!(path = %leaf.path, "unknown operator");
        return false;
    }
    let resolved = resolve(document, &leaf.path);
    if resolved.is_absent() {
        tracing::debug!(path = %leaf.path, "path not found");
        return false;
    }
    if !type_matches(&resolved, &leaf.value) {
        tracing::debug!(path = %leaf.path, expected = %leaf.value.kind(), "type mismatch");
        return false;
    }
    let comparer = match registry.lookup(&leaf.comparer) {
        Lookup::Found(c) => c,
        Lookup::NotFound => {
            tracing::debug!(comparer = %leaf.comparer, "unknown comparer");
            return false;
        }
    };
    let matched = match &resolved {
        Resolved::One(v) => comparer.compare(v, &leaf.value),
        Resolved::Many(members) => fan_out(members, &leaf.value, comparer, leaf.operator),
        Resolved::Absent => false,
    };
    tracing::trace!(
        comparer = comparer.name(),
        path = %leaf.path,
        operator = %leaf.operator,
        matched,
        "leaf evaluated"
    );
    matched
}
