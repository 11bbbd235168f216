//! Lint and format result types.

use serde::Serialize;

use crate::emit::Diagnostic;
use crate::fix::FixStatus;

/// Result of linting one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintResult {
    /// Diagnostics in emission order.
    pub diagnostics: Vec<Diagnostic>,

    /// Qualified rule ids in the order they ran.
    pub execution_order: Vec<String>,
}

impl LintResult {
    /// Returns true if any rule reported a finding.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Returns the number of diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }
}

/// Result of formatting one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatResult {
    /// The rendered text after the last completed pass.
    pub output: String,

    /// Whether `output` differs from the input.
    pub changed: bool,

    /// Diagnostics of every pass, in emission order.
    pub diagnostics: Vec<Diagnostic>,

    /// How the autocorrect loop ended.
    pub status: FixStatus,

    /// Qualified rule ids in the order they ran.
    pub execution_order: Vec<String>,
}

impl FormatResult {
    /// Diagnostics reported by the last pass only.
    ///
    /// After convergence these are the findings that autocorrect could not
    /// resolve.
    pub fn last_pass_diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        let last = self.status.passes();
        self.diagnostics.iter().filter(move |d| d.pass == last)
    }
}

/// Summary over many results, e.g. of a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LintSummary {
    /// Total texts processed.
    pub sources_checked: usize,

    /// Total diagnostics found.
    pub total_diagnostics: usize,

    /// Texts with at least one diagnostic.
    pub sources_with_errors: usize,
}

impl LintSummary {
    /// Creates a summary from results.
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a LintResult>) -> Self {
        let mut summary = Self::default();

        for result in results {
            summary.sources_checked += 1;
            summary.total_diagnostics += result.error_count();
            if result.has_errors() {
                summary.sources_with_errors += 1;
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic(rule_id: &str, pass: usize) -> Diagnostic {
        Diagnostic {
            rule_id: rule_id.to_string(),
            message: "msg".to_string(),
            offset: 0,
            line: 1,
            column: 1,
            can_auto_correct: false,
            corrected: false,
            pass,
        }
    }

    fn lint_result(diagnostics: Vec<Diagnostic>) -> LintResult {
        LintResult {
            diagnostics,
            execution_order: vec![],
        }
    }

    #[test]
    fn test_lint_result_counts() {
        let clean = lint_result(vec![]);
        assert!(!clean.has_errors());

        let dirty = lint_result(vec![diagnostic("a", 0), diagnostic("b", 0)]);
        assert!(dirty.has_errors());
        assert_eq!(dirty.error_count(), 2);
    }

    #[test]
    fn test_lint_summary() {
        let results = vec![
            lint_result(vec![]),
            lint_result(vec![diagnostic("a", 0)]),
            lint_result(vec![diagnostic("a", 0), diagnostic("b", 0)]),
        ];

        let summary = LintSummary::from_results(&results);

        assert_eq!(summary.sources_checked, 3);
        assert_eq!(summary.total_diagnostics, 3);
        assert_eq!(summary.sources_with_errors, 2);
    }

    #[test]
    fn test_lint_summary_empty() {
        let results: Vec<LintResult> = vec![];
        assert_eq!(LintSummary::from_results(&results), LintSummary::default());
    }

    #[test]
    fn test_last_pass_diagnostics() {
        let result = FormatResult {
            output: String::new(),
            changed: true,
            diagnostics: vec![diagnostic("a", 1), diagnostic("b", 2), diagnostic("c", 2)],
            status: FixStatus::Converged { passes: 2 },
            execution_order: vec![],
        };
        let ids: Vec<&str> = result
            .last_pass_diagnostics()
            .map(|d| d.rule_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }
}
