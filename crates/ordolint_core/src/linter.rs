//! Core linter engine.

use ordolint_parser::{Parser, TokenParser};
use tracing::{debug, info};

use crate::emit::{Diagnostic, DiagnosticSink};
use crate::engine;
use crate::fix::FixCoordinator;
use crate::result::{FormatResult, LintResult};
use crate::rule::RuleSet;
use crate::scheduler::ExecutionOrder;
use crate::{LinterConfig, LinterError};

/// Input of a single lint or format invocation.
#[derive(Debug, Clone, Copy)]
pub struct LintParams<'a> {
    /// Source text; never modified.
    pub text: &'a str,
    /// Rule sets in caller order.
    pub rule_sets: &'a [RuleSet],
}

impl<'a> LintParams<'a> {
    pub fn new(text: &'a str, rule_sets: &'a [RuleSet]) -> Self {
        Self { text, rule_sets }
    }
}

/// The core linter engine.
///
/// Orchestrates parsing, rule scheduling, traversal and autocorrection.
/// A `Linter` holds no per-invocation state and can be shared between
/// threads.
pub struct Linter {
    /// Linter configuration.
    config: LinterConfig,
    /// Parser turning source text into a tree.
    parser: Box<dyn Parser>,
}

impl Linter {
    /// Creates a linter using the reference [`TokenParser`].
    pub fn new(config: LinterConfig) -> Self {
        Self::with_parser(config, TokenParser::new())
    }

    /// Creates a linter with a custom parser.
    pub fn with_parser(config: LinterConfig, parser: impl Parser + 'static) -> Self {
        Self {
            config,
            parser: Box::new(parser),
        }
    }

    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    pub fn parser(&self) -> &dyn Parser {
        self.parser.as_ref()
    }

    /// Schedules the enabled rules of `rule_sets`.
    pub fn execution_order(&self, rule_sets: &[RuleSet]) -> Result<ExecutionOrder, LinterError> {
        ExecutionOrder::new(rule_sets, |id| self.config.is_rule_enabled(id))
    }

    /// Lints `params.text` in a single read-only pass.
    ///
    /// `callback` sees every diagnostic in emission order, before the
    /// result is returned.
    pub fn lint(
        &self,
        params: LintParams<'_>,
        mut callback: impl FnMut(&Diagnostic),
    ) -> Result<LintResult, LinterError> {
        let order = self.execution_order(params.rule_sets)?;
        self.lint_with_order(params.text, &order, &mut callback)
    }

    /// Formats `params.text`, repeating autocorrect passes until the tree
    /// stops changing or the configured pass ceiling is hit.
    ///
    /// Not converging is not an error: the text of the last completed pass
    /// is returned together with the [`FixStatus`](crate::FixStatus).
    pub fn format(
        &self,
        params: LintParams<'_>,
        mut callback: impl FnMut(&Diagnostic),
    ) -> Result<FormatResult, LinterError> {
        let order = self.execution_order(params.rule_sets)?;
        self.format_with_order(params.text, &order, &mut callback)
    }

    pub(crate) fn lint_with_order(
        &self,
        text: &str,
        order: &ExecutionOrder,
        callback: &mut dyn FnMut(&Diagnostic),
    ) -> Result<LintResult, LinterError> {
        let mut tree = self.parser.parse(text)?;
        let mut sink = DiagnosticSink::new(callback, self.config.inline_directives);
        sink.begin_pass(0, &tree);

        let outcome = engine::walk(&mut tree, order, false, &mut sink)?;
        let diagnostics = sink.into_diagnostics();
        debug!(
            "Lint finished: {} visit(s), {} diagnostic(s)",
            outcome.visits,
            diagnostics.len()
        );

        Ok(LintResult {
            diagnostics,
            execution_order: owned_ids(order),
        })
    }

    pub(crate) fn format_with_order(
        &self,
        text: &str,
        order: &ExecutionOrder,
        callback: &mut dyn FnMut(&Diagnostic),
    ) -> Result<FormatResult, LinterError> {
        let mut tree = self.parser.parse(text)?;
        let mut sink = DiagnosticSink::new(callback, self.config.inline_directives);
        let coordinator = FixCoordinator::new(self.config.max_format_passes);

        let status = coordinator.run(&mut tree, |tree, pass| {
            sink.begin_pass(pass, tree);
            engine::walk(tree, order, true, &mut sink)
        })?;

        let output = tree.render();
        let changed = output != text;
        if changed {
            info!("Formatted text in {} pass(es)", status.passes());
        }

        Ok(FormatResult {
            output,
            changed,
            diagnostics: sink.into_diagnostics(),
            status,
            execution_order: owned_ids(order),
        })
    }
}

fn owned_ids(order: &ExecutionOrder) -> Vec<String> {
    order.ids().into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::Emitter;
    use crate::fix::FixStatus;
    use crate::rule::{Rule, RuleError, VisitContext};
    use ordolint_ast::NodeKind;
    use ordolint_parser::ParseError;
    use pretty_assertions::assert_eq;

    /// Flags trailing whitespace before a line break and removes it.
    struct NoTrailingSpaces;

    impl Rule for NoTrailingSpaces {
        fn id(&self) -> &str {
            "no-trailing-spaces"
        }

        fn visit(&self, ctx: &mut VisitContext<'_>, emit: &mut Emitter<'_>) -> Result<(), RuleError> {
            let node = ctx.node();
            let trailing = node.kind() == NodeKind::Whitespace
                && node
                    .next_sibling()
                    .is_none_or(|next| next.kind() == NodeKind::Newline);
            if !trailing {
                return Ok(());
            }
            let (id, offset) = (node.id(), node.start_offset());
            emit.emit(offset, "Trailing space(s)", true);
            if let Some(tree) = ctx.tree_mut() {
                tree.remove(id)?;
            }
            Ok(())
        }
    }

    fn rule_sets() -> Vec<RuleSet> {
        vec![RuleSet::new("standard").with_rule(NoTrailingSpaces)]
    }

    #[test]
    fn test_lint_reports_without_changing() {
        let linter = Linter::new(LinterConfig::new());
        let sets = rule_sets();
        let text = "a  \nb\t\n";
        let mut seen = Vec::new();

        let result = linter
            .lint(LintParams::new(text, &sets), |d| seen.push(d.offset))
            .unwrap();

        assert_eq!(seen, vec![1, 5]);
        assert_eq!(result.error_count(), 2);
        assert_eq!(result.execution_order, vec!["no-trailing-spaces"]);
        assert!(result.diagnostics.iter().all(|d| d.pass == 0 && !d.corrected));
    }

    #[test]
    fn test_format_fixes_and_converges() {
        let linter = Linter::new(LinterConfig::new());
        let sets = rule_sets();

        let result = linter
            .format(LintParams::new("a  \nb\t\n", &sets), |_| {})
            .unwrap();

        assert_eq!(result.output, "a\nb\n");
        assert!(result.changed);
        assert_eq!(result.status, FixStatus::Converged { passes: 2 });
        assert_eq!(result.diagnostics.len(), 2);
        assert!(result.diagnostics.iter().all(|d| d.pass == 1 && d.corrected));
        assert_eq!(result.last_pass_diagnostics().count(), 0);
    }

    #[test]
    fn test_disabled_rule_is_not_run() {
        let config = LinterConfig {
            disabled_rules: vec!["no-trailing-spaces".to_string()],
            ..LinterConfig::new()
        };
        let linter = Linter::new(config);
        let sets = rule_sets();

        let result = linter.lint(LintParams::new("a  \n", &sets), |_| {}).unwrap();
        assert!(!result.has_errors());
        assert!(result.execution_order.is_empty());
    }

    #[test]
    fn test_parse_error_before_rules() {
        let linter = Linter::new(LinterConfig::new());
        let sets = rule_sets();

        let err = linter
            .lint(LintParams::new("fun main() {", &sets), |_| {})
            .unwrap_err();
        assert!(matches!(
            err,
            LinterError::Parse(ParseError::InvalidSource { offset: Some(11), .. })
        ));
    }

    #[test]
    fn test_inline_directives_can_be_turned_off() {
        let text = "// ordolint-disable\na  \n";
        let sets = rule_sets();

        let honoured = Linter::new(LinterConfig::new())
            .lint(LintParams::new(text, &sets), |_| {})
            .unwrap();
        assert!(!honoured.has_errors());

        let ignored = Linter::new(LinterConfig {
            inline_directives: false,
            ..LinterConfig::new()
        })
        .lint(LintParams::new(text, &sets), |_| {})
        .unwrap();
        assert_eq!(ignored.error_count(), 1);
    }
}
