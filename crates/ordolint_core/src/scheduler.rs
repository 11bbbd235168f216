//! Rule scheduling.
//!
//! Rule sets arrive in caller order with rules in declaration order. The
//! scheduler flattens them, validates ids and sorts once by
//! [`SchedulingKey`]. The sort is stable, so rules with equal keys keep
//! their declaration order.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::error::LinterError;
use crate::rule::{Rule, RuleSet, VisitorModifiers, is_valid_namespace, is_valid_rule_id};

/// Sort key derived from a rule's modifiers.
///
/// Orders by `(is_late, !is_root_only)` ascending: regular rules before
/// late ones, and within each group root-only rules first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchedulingKey {
    pub is_late: bool,
    pub is_root_only: bool,
}

impl SchedulingKey {
    pub fn of(modifiers: VisitorModifiers) -> Self {
        Self {
            is_late: modifiers.is_late(),
            is_root_only: modifiers.is_root_only(),
        }
    }

    fn sort_tuple(&self) -> (bool, bool) {
        (self.is_late, !self.is_root_only)
    }
}

impl Ord for SchedulingKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_tuple().cmp(&other.sort_tuple())
    }
}

impl PartialOrd for SchedulingKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A rule together with its qualified id and precomputed key.
#[derive(Clone)]
pub struct ScheduledRule {
    qualified_id: String,
    rule: Arc<dyn Rule>,
    key: SchedulingKey,
}

impl ScheduledRule {
    pub fn qualified_id(&self) -> &str {
        &self.qualified_id
    }

    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }

    pub fn key(&self) -> SchedulingKey {
        self.key
    }

    #[inline]
    pub fn is_root_only(&self) -> bool {
        self.key.is_root_only
    }
}

impl std::fmt::Debug for ScheduledRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledRule")
            .field("qualified_id", &self.qualified_id)
            .field("key", &self.key)
            .finish()
    }
}

/// The deterministic order in which rules visit each node.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOrder {
    rules: Vec<ScheduledRule>,
}

impl ExecutionOrder {
    /// Schedules every rule of `rule_sets`.
    pub fn all(rule_sets: &[RuleSet]) -> Result<Self, LinterError> {
        Self::new(rule_sets, |_| true)
    }

    /// Schedules the rules of `rule_sets` for which `is_enabled` holds.
    ///
    /// Fails with [`LinterError::Config`] on a malformed namespace or rule
    /// id, or when two rules share a qualified id. Disabled rules still
    /// take part in that validation.
    pub fn new(
        rule_sets: &[RuleSet],
        is_enabled: impl Fn(&str) -> bool,
    ) -> Result<Self, LinterError> {
        let mut seen = HashSet::new();
        let mut rules = Vec::new();

        for set in rule_sets {
            if !is_valid_namespace(set.namespace()) {
                return Err(LinterError::config(format!(
                    "Invalid rule set namespace '{}'",
                    set.namespace()
                )));
            }

            for rule in set.rules() {
                if !is_valid_rule_id(rule.id()) {
                    return Err(LinterError::config(format!(
                        "Invalid rule id '{}' in rule set '{}'",
                        rule.id(),
                        set.namespace()
                    )));
                }

                let qualified_id = set.qualified_id(rule.id());
                if !seen.insert(qualified_id.clone()) {
                    return Err(LinterError::config(format!(
                        "Duplicate rule id '{}'",
                        qualified_id
                    )));
                }

                if !is_enabled(&qualified_id) {
                    debug!("Rule '{}' is disabled", qualified_id);
                    continue;
                }

                rules.push(ScheduledRule {
                    key: SchedulingKey::of(rule.modifiers()),
                    qualified_id,
                    rule: Arc::clone(rule),
                });
            }
        }

        rules.sort_by_key(|scheduled| scheduled.key);

        let order = Self { rules };
        debug!(
            "Scheduled {} rule(s): [{}]",
            order.len(),
            order.ids().join(", ")
        );
        Ok(order)
    }

    /// Qualified ids in execution order.
    pub fn ids(&self) -> Vec<&str> {
        self.rules.iter().map(ScheduledRule::qualified_id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledRule> {
        self.rules.iter()
    }

    /// Rules eligible for a node: all of them at the root, otherwise every
    /// rule that is not root-only. Relative order is preserved.
    pub fn for_node(&self, is_root: bool) -> impl Iterator<Item = &ScheduledRule> {
        self.rules
            .iter()
            .filter(move |scheduled| is_root || !scheduled.is_root_only())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
