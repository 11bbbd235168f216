//! Diagnostic emission.
//!
//! Rules report findings through an [`Emitter`] bound to the rule and the
//! visit. Every emission lands in the [`DiagnosticSink`] of the current
//! invocation, which resolves positions, applies inline suppressions,
//! forwards the diagnostic to the caller and keeps a copy.

use ordolint_ast::SyntaxTree;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::line_index::LineIndex;
use crate::suppression::SuppressionLocator;

/// A finding reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Qualified id of the reporting rule.
    pub rule_id: String,

    /// The diagnostic message.
    pub message: String,

    /// Byte offset into the text as it was when the finding was reported.
    pub offset: u32,

    /// Line number (1-indexed).
    pub line: u32,

    /// Column number (1-indexed, in chars).
    pub column: u32,

    /// Whether the rule can fix this finding.
    pub can_auto_correct: bool,

    /// Whether the finding was reported during an autocorrect visit of a
    /// rule that declared it fixable.
    pub corrected: bool,

    /// 0 for lint, 1-based pass number for format.
    pub pass: usize,
}

/// Receiving end of an [`Emitter`].
pub(crate) trait Record {
    fn record(&mut self, emission: Emission<'_>);
}

pub(crate) struct Emission<'a> {
    pub rule_id: &'a str,
    pub offset: u32,
    pub message: String,
    pub can_auto_correct: bool,
    pub auto_correct: bool,
}

/// Per-visit handle a rule reports through.
pub struct Emitter<'a> {
    sink: &'a mut dyn Record,
    rule_id: &'a str,
    auto_correct: bool,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(sink: &'a mut dyn Record, rule_id: &'a str, auto_correct: bool) -> Self {
        Self {
            sink,
            rule_id,
            auto_correct,
        }
    }

    /// Reports a finding at `offset`.
    ///
    /// Offsets past the end of the text are clamped onto it.
    pub fn emit(&mut self, offset: u32, message: impl Into<String>, can_auto_correct: bool) {
        self.sink.record(Emission {
            rule_id: self.rule_id,
            offset,
            message: message.into(),
            can_auto_correct,
            auto_correct: self.auto_correct,
        });
    }

    /// Qualified id of the rule this emitter reports for.
    pub fn rule_id(&self) -> &str {
        self.rule_id
    }
}

/// Collects the diagnostics of one invocation.
pub struct DiagnosticSink<'cb> {
    callback: &'cb mut dyn FnMut(&Diagnostic),
    diagnostics: Vec<Diagnostic>,
    lines: LineIndex,
    suppressions: SuppressionLocator,
    inline_directives: bool,
    pass: usize,
}

impl<'cb> DiagnosticSink<'cb> {
    /// Creates a sink forwarding every kept diagnostic to `callback`.
    ///
    /// [`begin_pass`](Self::begin_pass) must run before the first walk.
    pub fn new(callback: &'cb mut dyn FnMut(&Diagnostic), inline_directives: bool) -> Self {
        Self {
            callback,
            diagnostics: Vec::new(),
            lines: LineIndex::default(),
            suppressions: SuppressionLocator::none(),
            inline_directives,
            pass: 0,
        }
    }

    /// Starts pass `pass` over `tree`.
    pub fn begin_pass(&mut self, pass: usize, tree: &SyntaxTree) {
        self.pass = pass;
        self.sync(tree);
    }

    /// Re-reads line starts and directives after `tree` changed.
    pub(crate) fn sync(&mut self, tree: &SyntaxTree) {
        self.lines = LineIndex::new(&tree.render());
        self.suppressions = if self.inline_directives {
            SuppressionLocator::from_tree(tree, &self.lines)
        } else {
            SuppressionLocator::none()
        };
    }

    pub fn pass(&self) -> usize {
        self.pass
    }

    /// Whether `rule_id` is silenced at `offset` in the current pass.
    pub fn is_suppressed(&self, offset: u32, rule_id: &str, is_root: bool) -> bool {
        self.suppressions.is_suppressed(offset, rule_id, is_root)
    }

    /// Diagnostics kept so far, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Record for DiagnosticSink<'_> {
    fn record(&mut self, emission: Emission<'_>) {
        if self
            .suppressions
            .is_suppressed(emission.offset, emission.rule_id, false)
        {
            trace!(
                "Suppressed {} at offset {}",
                emission.rule_id, emission.offset
            );
            return;
        }

        let offset = self.lines.clamp(emission.offset);
        let position = self.lines.position(offset);
        let diagnostic = Diagnostic {
            rule_id: emission.rule_id.to_string(),
            message: emission.message,
            offset,
            line: position.line,
            column: position.column,
            can_auto_correct: emission.can_auto_correct,
            corrected: emission.auto_correct && emission.can_auto_correct,
            pass: self.pass,
        };
        (self.callback)(&diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordolint_parser::{Parser, TokenParser};
    use pretty_assertions::assert_eq;

    fn tree(source: &str) -> SyntaxTree {
        TokenParser::new().parse(source).unwrap()
    }

    #[test]
    fn test_emit_resolves_position() {
        let mut seen = Vec::new();
        let mut callback = |d: &Diagnostic| seen.push(d.clone());
        let mut sink = DiagnosticSink::new(&mut callback, true);
        sink.begin_pass(0, &tree("a\n\tb"));

        Emitter::new(&mut sink, "no-tabs", false).emit(2, "Unexpected tab", true);

        let diagnostics = sink.into_diagnostics();
        assert_eq!(
            diagnostics,
            vec![Diagnostic {
                rule_id: "no-tabs".to_string(),
                message: "Unexpected tab".to_string(),
                offset: 2,
                line: 2,
                column: 1,
                can_auto_correct: true,
                corrected: false,
                pass: 0,
            }]
        );
        assert_eq!(seen, diagnostics);
    }

    #[test]
    fn test_corrected_requires_both_flags() {
        let mut callback = |_: &Diagnostic| {};
        let mut sink = DiagnosticSink::new(&mut callback, true);
        sink.begin_pass(1, &tree("x"));

        let mut emitter = Emitter::new(&mut sink, "r", true);
        emitter.emit(0, "fixable", true);
        emitter.emit(0, "not fixable", false);
        Emitter::new(&mut sink, "r", false).emit(0, "lint only", true);

        let corrected: Vec<bool> = sink.diagnostics().iter().map(|d| d.corrected).collect();
        assert_eq!(corrected, vec![true, false, false]);
        assert!(sink.diagnostics().iter().all(|d| d.pass == 1));
    }

    #[test]
    fn test_offset_is_clamped() {
        let mut callback = |_: &Diagnostic| {};
        let mut sink = DiagnosticSink::new(&mut callback, true);
        sink.begin_pass(0, &tree("abc"));

        Emitter::new(&mut sink, "r", false).emit(99, "past end", false);

        let diagnostic = &sink.diagnostics()[0];
        assert_eq!(diagnostic.offset, 3);
        assert_eq!((diagnostic.line, diagnostic.column), (1, 4));
    }

    #[test]
    fn test_suppressed_emission_is_dropped() {
        let source = "a\n// ordolint-disable r\nb\n";
        let b = source.find('b').unwrap() as u32;
        let mut calls = 0;
        let mut callback = |_: &Diagnostic| calls += 1;
        let mut sink = DiagnosticSink::new(&mut callback, true);
        sink.begin_pass(0, &tree(source));

        let mut emitter = Emitter::new(&mut sink, "r", false);
        emitter.emit(0, "kept", false);
        emitter.emit(b, "dropped", false);
        Emitter::new(&mut sink, "other", false).emit(b, "kept", false);

        assert_eq!(sink.diagnostics().len(), 2);
        drop(sink);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_directives_ignored_when_disabled() {
        let source = "// ordolint-disable\nb\n";
        let mut callback = |_: &Diagnostic| {};
        let mut sink = DiagnosticSink::new(&mut callback, false);
        sink.begin_pass(0, &tree(source));

        Emitter::new(&mut sink, "r", false).emit(20, "kept", false);
        assert_eq!(sink.diagnostics().len(), 1);
    }
}
