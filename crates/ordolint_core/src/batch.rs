//! Parallel processing of independent texts.
//!
//! The execution order is computed once and shared read-only. Every text
//! gets its own tree and diagnostic sink, so rules only need to be
//! `Send + Sync` for this to be sound.

use rayon::prelude::*;
use tracing::warn;

use crate::emit::Diagnostic;
use crate::error::LinterError;
use crate::linter::Linter;
use crate::result::{FormatResult, LintResult};
use crate::rule::RuleSet;

/// A named input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Caller-chosen name, e.g. a file path.
    pub name: String,
    pub text: String,
}

impl Source {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Successes and per-source failures, each in input order.
pub type BatchResult<T> = Result<(Vec<(String, T)>, Vec<(String, LinterError)>), LinterError>;

impl Linter {
    /// Lints every source in parallel.
    ///
    /// Configuration errors fail the whole batch; parse errors and rule
    /// faults are reported per source.
    pub fn lint_batch(&self, sources: &[Source], rule_sets: &[RuleSet]) -> BatchResult<LintResult> {
        let order = self.execution_order(rule_sets)?;
        let results: Vec<Result<LintResult, LinterError>> = sources
            .par_iter()
            .map(|source| self.lint_with_order(&source.text, &order, &mut |_: &Diagnostic| {}))
            .collect();
        Ok(partition(sources, results))
    }

    /// Formats every source in parallel.
    pub fn format_batch(
        &self,
        sources: &[Source],
        rule_sets: &[RuleSet],
    ) -> BatchResult<FormatResult> {
        let order = self.execution_order(rule_sets)?;
        let results: Vec<Result<FormatResult, LinterError>> = sources
            .par_iter()
            .map(|source| self.format_with_order(&source.text, &order, &mut |_: &Diagnostic| {}))
            .collect();
        Ok(partition(sources, results))
    }
}

#[allow(clippy::type_complexity)]
fn partition<T>(
    sources: &[Source],
    results: Vec<Result<T, LinterError>>,
) -> (Vec<(String, T)>, Vec<(String, LinterError)>) {
    let mut successes = Vec::new();
    let mut failures = Vec::new();
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(value) => successes.push((source.name.clone(), value)),
            Err(error) => {
                warn!("Failed to process {}: {}", source.name, error);
                failures.push((source.name.clone(), error));
            }
        }
    }
    (successes, failures)
}
