use crate::errors::{EvalError, Result};
use crate::path::Path;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::fmt;
use std::str::FromStr;

/// Boolean fold applied to a composite's children, or to the values a leaf
/// path fans out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operator {
    #[default]
    And,
    Or,
    /// Operator text that is neither `and` nor `or`. Never matches.
    Unknown,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Unknown => "unknown",
        }
    }
}

impl FromStr for Operator {
    type Err = EvalError;

    /// Case-insensitive; the empty string is `And`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "and" => Ok(Operator::And),
            "or" => Ok(Operator::Or),
            other => Err(EvalError::Rule(format!("unknown operator {other:?}"))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single comparison against one document location.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub comparer: String,
    pub path: Path,
    pub value: Value,
    /// Fold used when `path` resolves to several values.
    pub operator: Operator,
}

/// A node of a rule tree. Leaf or composite is decided once, at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRule", into = "RawRule")]
pub enum Rule {
    Leaf(Leaf),
    Composite { operator: Operator, rules: Vec<Rule> },
}

impl Rule {
    /// Parse a rule from its JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawRule = serde_json::from_str(text).map_err(EvalError::RuleJson)?;
        Ok(Rule::from(raw))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(EvalError::RuleJson)
    }

    pub fn leaf(comparer: &str, path: &str, value: impl Into<Value>) -> Self {
        Rule::Leaf(Leaf {
            comparer: comparer.to_string(),
            path: Path::new(path),
            value: value.into(),
            operator: Operator::And,
        })
    }

    /// Composite requiring every child to match.
    pub fn all(rules: Vec<Rule>) -> Self {
        Rule::Composite { operator: Operator::And, rules }
    }

    /// Composite requiring at least one child to match.
    pub fn any(rules: Vec<Rule>) -> Self {
        Rule::Composite { operator: Operator::Or, rules }
    }

    pub fn with_operator(mut self, op: Operator) -> Self {
        match &mut self {
            Rule::Leaf(leaf) => leaf.operator = op,
            Rule::Composite { operator, .. } => *operator = op,
        }
        self
    }

    pub fn operator(&self) -> Operator {
        match self {
            Rule::Leaf(leaf) => leaf.operator,
            Rule::Composite { operator, .. } => *operator,
        }
    }
}

/// Wire shape of a rule, as written by callers and by the migration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RawRule {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub(crate) comparer: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub(crate) path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) value: Option<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) operator: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) rules: Vec<RawRule>,
}

impl From<RawRule> for Rule {
    fn from(raw: RawRule) -> Self {
        let operator = match raw.operator.as_deref() {
            Some(s) => s.parse().unwrap_or_else(|e| {
                tracing::debug!(error = %e, "rule node will never match");
                Operator::Unknown
            }),
            None => Operator::default(),
        };
        if raw.rules.is_empty() {
            return Rule::Leaf(Leaf {
                comparer: raw.comparer,
                path: Path::new(raw.path),
                value: raw.value.map(Value::from).unwrap_or(Value::Null),
                operator,
            });
        }
        let rules = raw.rules.into_iter().map(Rule::from).collect();
        Rule::Composite { operator, rules }
    }
}

impl From<Rule> for RawRule {
    fn from(rule: Rule) -> Self {
        match rule {
            Rule::Leaf(leaf) => RawRule {
                comparer: leaf.comparer,
                path: leaf.path.as_str().to_string(),
                value: Some(Json::from(&leaf.value)),
                operator: (leaf.operator != Operator::And).then(|| leaf.operator.to_string()),
                rules: Vec::new(),
            },
            Rule::Composite { operator, rules } => RawRule {
                operator: Some(operator.to_string()),
                rules: rules.into_iter().map(RawRule::from).collect(),
                ..RawRule::default()
            },
        }
    }
}
