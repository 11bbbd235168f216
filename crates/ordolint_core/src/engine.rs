//! Tree traversal.
//!
//! One call to [`walk`] is one pass: a depth-first pre-order walk that
//! hands every node to each eligible rule in [`ExecutionOrder`]. Rules may
//! edit the tree while it runs, so the walk keeps its own stack and reads a
//! node's children only after that node's rules are done.

use ordolint_ast::SyntaxTree;
use tracing::trace;

use crate::emit::{DiagnosticSink, Emitter};
use crate::error::LinterError;
use crate::rule::VisitContext;
use crate::scheduler::ExecutionOrder;

/// What a single walk did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOutcome {
    /// Number of rule invocations.
    pub visits: usize,
    /// Whether any rule changed the tree.
    pub mutated: bool,
}

/// Walks `tree` once, dispatching every node to the eligible rules.
///
/// With `auto_correct` set, rules get mutable access to the tree except
/// where an inline directive suppresses them. The first rule fault aborts
/// the walk.
pub fn walk(
    tree: &mut SyntaxTree,
    order: &ExecutionOrder,
    auto_correct: bool,
    sink: &mut DiagnosticSink<'_>,
) -> Result<WalkOutcome, LinterError> {
    let start_revision = tree.revision();
    let root = tree.root();
    let mut visits = 0;
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if !tree.is_attached(node) {
            continue;
        }
        let is_root = node == root;

        for scheduled in order.for_node(is_root) {
            // An earlier rule may have removed the node.
            if !tree.is_attached(node) {
                break;
            }
            let rule_id = scheduled.qualified_id();
            let suppressed = sink.is_suppressed(tree.start_offset(node), rule_id, is_root);
            let visit_auto_correct = auto_correct && !suppressed;

            let revision = tree.revision();
            let mut ctx = VisitContext::new(tree, node, visit_auto_correct);
            let mut emitter = Emitter::new(&mut *sink, rule_id, visit_auto_correct);
            scheduled
                .rule()
                .visit(&mut ctx, &mut emitter)
                .map_err(|source| LinterError::rule(rule_id, source))?;
            visits += 1;

            if tree.revision() != revision {
                sink.sync(tree);
            }
        }

        if tree.is_attached(node) {
            stack.extend(tree.children(node).iter().rev().copied());
        }
    }

    let mutated = tree.revision() != start_revision;
    trace!("Walk finished: {} visit(s), mutated: {}", visits, mutated);
    Ok(WalkOutcome { visits, mutated })
}
