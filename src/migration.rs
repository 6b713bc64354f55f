//! Rewrites the legacy `composites` rule format into the current rule tree.
//!
//! The legacy format is a flat list of composites, each an operator over a
//! list of comparisons:
//!
//! ```json
//! {"composites": [{"operator": "or", "rules": [{"comparator": "eq", "path": "a", "value": 1}]}]}
//! ```
//!
//! Nothing is evaluated here; the output is plain rule JSON that
//! [`Rule::from_json`](crate::rule::Rule::from_json) accepts as-is.

use crate::errors::{EvalError, Result};
use crate::rule::RawRule;
use serde::Deserialize;
use serde_json::Value as Json;

#[derive(Debug, Deserialize)]
struct LegacyComposites {
    #[serde(default)]
    composites: Vec<LegacyComposite>,
}

#[derive(Debug, Deserialize)]
struct LegacyComposite {
    #[serde(default)]
    operator: String,
    #[serde(default)]
    rules: Vec<LegacyRule>,
}

#[derive(Debug, Deserialize)]
struct LegacyRule {
    #[serde(default)]
    comparator: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    value: Option<Json>,
}

impl LegacyRule {
    fn into_raw(self) -> RawRule {
        RawRule {
            comparer: self.comparator,
            path: self.path,
            value: self.value,
            ..RawRule::default()
        }
    }
}

impl LegacyComposite {
    fn into_raw(mut self) -> RawRule {
        if self.rules.len() == 1 {
            if let Some(only) = self.rules.pop() {
                return only.into_raw();
            }
        }
        RawRule {
            operator: (!self.operator.is_empty()).then_some(self.operator),
            rules: self.rules.into_iter().map(LegacyRule::into_raw).collect(),
            ..RawRule::default()
        }
    }
}

impl LegacyComposites {
    fn into_raw(mut self) -> Result<RawRule> {
        match self.composites.len() {
            0 => Err(EvalError::Migration("no composites found".into())),
            1 => match self.composites.pop() {
                Some(only) => Ok(only.into_raw()),
                None => Err(EvalError::Migration("no composites found".into())),
            },
            _ => Ok(RawRule {
                operator: Some("and".into()),
                rules: self
                    .composites
                    .into_iter()
                    .map(LegacyComposite::into_raw)
                    .collect(),
                ..RawRule::default()
            }),
        }
    }
}

/// Convert legacy `composites` JSON into rule JSON.
pub fn migrate_v1_to_v2(legacy: &str) -> Result<String> {
    let composites: LegacyComposites =
        serde_json::from_str(legacy).map_err(EvalError::LegacyJson)?;
    let raw = composites.into_raw()?;
    tracing::debug!(composite = !raw.rules.is_empty(), "migrated legacy rule");
    serde_json::to_string(&raw).map_err(EvalError::RuleJson)
}
