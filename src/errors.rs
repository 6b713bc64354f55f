use thiserror::Error;

/// Everything that can stop an evaluation before it produces a boolean.
///
/// Semantic non-matches (missing path, type mismatch, unknown comparer) are
/// not errors; they evaluate to `false`.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("document is not valid JSON: {0}")]
    Document(#[source] serde_json::Error),

    #[error("rule is not valid JSON: {0}")]
    RuleJson(#[source] serde_json::Error),

    #[error("invalid rule: {0}")]
    Rule(String),

    #[error("legacy rule is not valid JSON: {0}")]
    LegacyJson(#[source] serde_json::Error),

    #[error("migration failed: {0}")]
    Migration(String),
}

pub type Result<T> = std::result::Result<T, EvalError>;
