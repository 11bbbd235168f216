//! Linter error types.

use ordolint_parser::ParseError;
use thiserror::Error;

use crate::rule::RuleError;

/// Errors that can occur during linting or formatting.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Configuration error, including rule set validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The source text could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A rule failed while visiting a node.
    #[error("Rule '{rule_id}' failed: {source}")]
    Rule {
        rule_id: String,
        #[source]
        source: RuleError,
    },

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Wraps a fault raised by `rule_id`.
    pub fn rule(rule_id: impl Into<String>, source: RuleError) -> Self {
        Self::Rule {
            rule_id: rule_id.into(),
            source,
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// The qualified id of the failing rule, if this is a rule fault.
    pub fn rule_id(&self) -> Option<&str> {
        match self {
            Self::Rule { rule_id, .. } => Some(rule_id),
            _ => None,
        }
    }
}
