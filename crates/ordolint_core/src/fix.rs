//! Autocorrect fixed-point loop.

use blake3::Hash;
use ordolint_ast::SyntaxTree;
use serde::Serialize;
use tracing::{debug, warn};

use crate::engine::WalkOutcome;
use crate::error::LinterError;

/// Pass ceiling used when none is configured.
pub const DEFAULT_MAX_PASSES: usize = 3;

/// How the autocorrect loop ended.
///
/// Only `Converged` guarantees a fixed point; the other two still leave
/// the tree of the last completed pass in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FixStatus {
    /// A pass changed nothing.
    Converged { passes: usize },
    /// The text after a pass matched the text after an earlier one.
    CycleDetected { passes: usize, cycle_length: usize },
    /// Every allowed pass still changed the tree.
    PassLimitReached { passes: usize },
}

impl FixStatus {
    /// Number of passes that ran.
    pub fn passes(&self) -> usize {
        match *self {
            Self::Converged { passes }
            | Self::CycleDetected { passes, .. }
            | Self::PassLimitReached { passes } => passes,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }
}

/// Repeats autocorrect passes until the tree stops changing.
#[derive(Debug, Clone, Copy)]
pub struct FixCoordinator {
    max_passes: usize,
}

impl FixCoordinator {
    /// Creates a coordinator allowing at most `max_passes` passes (at least one).
    pub fn new(max_passes: usize) -> Self {
        Self {
            max_passes: max_passes.max(1),
        }
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Runs `pass` with 1-based pass numbers until it reports no mutation,
    /// the rendered text repeats, or the ceiling is hit.
    pub fn run<F>(&self, tree: &mut SyntaxTree, mut pass: F) -> Result<FixStatus, LinterError>
    where
        F: FnMut(&mut SyntaxTree, usize) -> Result<WalkOutcome, LinterError>,
    {
        let mut history: Vec<Hash> = vec![self.hash_tree(tree)];

        for number in 1..=self.max_passes {
            let outcome = pass(tree, number)?;
            debug!(
                "Autocorrect pass {}: {} visit(s), mutated: {}",
                number, outcome.visits, outcome.mutated
            );

            if !outcome.mutated {
                return Ok(FixStatus::Converged { passes: number });
            }

            let current = self.hash_tree(tree);
            if let Some(prev_idx) = history.iter().position(|h| *h == current) {
                let cycle_length = history.len() - prev_idx;
                warn!(
                    "Autocorrect oscillates with a cycle of {} pass(es); keeping pass {}",
                    cycle_length, number
                );
                return Ok(FixStatus::CycleDetected {
                    passes: number,
                    cycle_length,
                });
            }
            history.push(current);
        }

        warn!(
            "Autocorrect did not converge within {} pass(es)",
            self.max_passes
        );
        Ok(FixStatus::PassLimitReached {
            passes: self.max_passes,
        })
    }

    fn hash_tree(&self, tree: &SyntaxTree) -> Hash {
        blake3::hash(tree.render().as_bytes())
    }
}

impl Default for FixCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PASSES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleError;
    use ordolint_ast::{NodeId, NodeKind};

    fn single_leaf(text: &str) -> (SyntaxTree, NodeId) {
        let mut tree = SyntaxTree::new();
        let root = tree.root();
        let leaf = tree.push_leaf(root, NodeKind::Identifier, text).unwrap();
        (tree, leaf)
    }

    fn outcome(mutated: bool) -> Result<WalkOutcome, LinterError> {
        Ok(WalkOutcome {
            visits: 1,
            mutated,
        })
    }

    #[test]
    fn test_convergence() {
        let (mut tree, leaf) = single_leaf("aaa");
        let status = FixCoordinator::default()
            .run(&mut tree, |tree, _| {
                let text = tree.leaf_text(leaf).unwrap_or_default().to_string();
                let shorter = &text[..text.len().saturating_sub(1).max(1)];
                let changed = tree.set_text(leaf, shorter).unwrap();
                outcome(changed)
            })
            .unwrap();

        assert_eq!(status, FixStatus::Converged { passes: 3 });
        assert_eq!(tree.render(), "a");
    }

    #[test]
    fn test_cycle_detection() {
        let (mut tree, leaf) = single_leaf("a");
        let status = FixCoordinator::new(10)
            .run(&mut tree, |tree, _| {
                let next = if tree.leaf_text(leaf) == Some("a") { "b" } else { "a" };
                tree.set_text(leaf, next).unwrap();
                outcome(true)
            })
            .unwrap();

        assert_eq!(
            status,
            FixStatus::CycleDetected {
                passes: 2,
                cycle_length: 2
            }
        );
        assert_eq!(tree.render(), "a");
    }

    #[test]
    fn test_mutation_restoring_same_text_is_a_cycle_of_one() {
        let (mut tree, _) = single_leaf("a");
        let status = FixCoordinator::default()
            .run(&mut tree, |tree, _| {
                let root = tree.root();
                let extra = tree.push_leaf(root, NodeKind::Identifier, "x").unwrap();
                tree.remove(extra).unwrap();
                outcome(true)
            })
            .unwrap();

        assert_eq!(
            status,
            FixStatus::CycleDetected {
                passes: 1,
                cycle_length: 1
            }
        );
    }

    #[test]
    fn test_pass_limit() {
        let (mut tree, leaf) = single_leaf("");
        let mut seen = Vec::new();
        let status = FixCoordinator::new(4)
            .run(&mut tree, |tree, number| {
                seen.push(number);
                let text = format!("{}x", tree.leaf_text(leaf).unwrap_or_default());
                tree.set_text(leaf, text).unwrap();
                outcome(true)
            })
            .unwrap();

        assert_eq!(status, FixStatus::PassLimitReached { passes: 4 });
        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert_eq!(tree.render(), "xxxx");
        assert!(!status.is_converged());
    }

    #[test]
    fn test_minimum_one_pass() {
        let coordinator = FixCoordinator::new(0);
        assert_eq!(coordinator.max_passes(), 1);

        let (mut tree, _) = single_leaf("a");
        let status = coordinator.run(&mut tree, |_, _| outcome(false)).unwrap();
        assert_eq!(status, FixStatus::Converged { passes: 1 });
        assert_eq!(status.passes(), 1);
    }

    #[test]
    fn test_error_stops_the_loop() {
        let (mut tree, _) = single_leaf("a");
        let mut calls = 0;
        let result = FixCoordinator::default().run(&mut tree, |_, _| {
            calls += 1;
            Err(LinterError::rule("boom", RuleError::new("failed")))
        });

        assert!(matches!(result, Err(LinterError::Rule { .. })));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let status = FixStatus::CycleDetected {
            passes: 2,
            cycle_length: 2,
        };
        insta::assert_json_snapshot!(status, @r#"
        {
          "status": "cycle_detected",
          "passes": 2,
          "cycle_length": 2
        }
        "#);
    }
}
