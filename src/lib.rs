pub mod errors;
pub mod value;
pub mod path;
pub mod guard;
pub mod comparers;  // named predicates, builtins plus caller-registered ones
pub mod engine;
pub mod rule;
pub mod migration;
mod comparison;
mod parser;

use serde_json::Value as Json;
use comparers::Registry;

pub use errors::{EvalError, Result};
pub use migration::migrate_v1_to_v2;
pub use parser::ParseError;
pub use path::{Path, Resolved};
pub use rule::{Leaf, Operator, Rule};
pub use value::{Kind, Value};

/// A parsed JSON document. Evaluation only ever reads it.
pub type Document = Json;

/// Evaluates rule trees against JSON documents using a fixed set of
/// comparers. Cheap to clone and safe to share between threads.
#[derive(Clone, Debug)]
pub struct Evaluator {
    registry: Registry,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(Registry::with_builtins())
    }
}

impl Evaluator {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Parse both inputs and evaluate. A parse failure in either argument is
    /// the only error; everything else is a plain `false`.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn evaluate(&self, document: &str, rule: &str) -> Result<bool> {
        let document = parse_document(document)?;
        let rule = Rule::from_json(rule)?;
        Ok(self.evaluate_rule(&document, &rule))
    }

    /// Evaluate an already-parsed rule, e.g. one reused across many documents.
    pub fn evaluate_rule(&self, document: &Document, rule: &Rule) -> bool {
        let matched = engine::evaluate_rule(rule, document, &self.registry);
        tracing::debug!(matched, "rule evaluated");
        matched
    }
}

pub fn parse_document(text: &str) -> Result<Document> {
    serde_json::from_str(text).map_err(EvalError::Document)
}

/// Convenience: evaluate with the builtin comparers.
pub fn evaluate(document: &str, rule: &str) -> Result<bool> {
    Evaluator::default().evaluate(document, rule)
}
