//! # ordolint_core
//!
//! Core lint and format engine for ordolint.
//!
//! This crate provides:
//! - The `Rule` contract and namespaced `RuleSet`s
//! - Deterministic rule scheduling driven by visitor modifiers
//! - A single-pass pre-order traversal engine
//! - An autocorrect loop that repeats passes until the tree is stable
//! - Configuration loading, inline suppression and parallel batches
//!
//! ## Example
//!
//! ```rust
//! use ordolint_core::{Emitter, LintParams, Linter, LinterConfig, Rule, RuleError, RuleSet, VisitContext};
//! use ordolint_ast::NodeKind;
//!
//! struct NoSemicolons;
//!
//! impl Rule for NoSemicolons {
//!     fn id(&self) -> &str {
//!         "no-semicolons"
//!     }
//!
//!     fn visit(&self, ctx: &mut VisitContext<'_>, emit: &mut Emitter<'_>) -> Result<(), RuleError> {
//!         let node = ctx.node();
//!         if node.kind() == NodeKind::Punctuation && node.text() == Some(";") {
//!             let (id, offset) = (node.id(), node.start_offset());
//!             emit.emit(offset, "Unnecessary semicolon", true);
//!             if let Some(tree) = ctx.tree_mut() {
//!                 tree.remove(id)?;
//!             }
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let linter = Linter::new(LinterConfig::default());
//! let rule_sets = [RuleSet::new("standard").with_rule(NoSemicolons)];
//!
//! let lint = linter.lint(LintParams::new("val a = 1;", &rule_sets), |_| {}).unwrap();
//! assert_eq!(lint.diagnostics[0].column, 10);
//!
//! let format = linter.format(LintParams::new("val a = 1;", &rule_sets), |_| {}).unwrap();
//! assert_eq!(format.output, "val a = 1");
//! ```

mod batch;
mod config;
mod emit;
mod engine;
mod error;
mod fix;
pub mod line_index;
mod linter;
mod result;
mod rule;
mod scheduler;
pub mod suppression;

pub use batch::{BatchResult, Source};
pub use config::{CONFIG_FILE_NAMES, LinterConfig};
pub use emit::{Diagnostic, DiagnosticSink, Emitter};
pub use engine::{WalkOutcome, walk};
pub use error::LinterError;
pub use fix::{DEFAULT_MAX_PASSES, FixCoordinator, FixStatus};
pub use linter::{LintParams, Linter};
pub use result::{FormatResult, LintResult, LintSummary};
pub use rule::{
    Rule, RuleError, RuleSet, STANDARD_NAMESPACE, VisitContext, VisitorModifier, VisitorModifiers,
    is_valid_namespace, is_valid_rule_id, qualify,
};
pub use scheduler::{ExecutionOrder, ScheduledRule, SchedulingKey};
