//! Rule contract: identity, scheduling modifiers and the visit operation.

use std::sync::Arc;

use ordolint_ast::{NodeId, NodeRef, SyntaxTree, TreeError};
use thiserror::Error;

use crate::emit::Emitter;

/// Namespace whose rules are reported under their bare id.
pub const STANDARD_NAMESPACE: &str = "standard";

/// Scheduling annotation on a rule.
///
/// Modifiers change when and where a rule runs, never what it checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitorModifier {
    /// Run after every rule that lacks this modifier.
    RunAsLateAsPossible,
    /// Only visit the root node, once per walk.
    RunOnRootNodeOnly,
}

/// Set of [`VisitorModifier`]s carried by a rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VisitorModifiers {
    late: bool,
    root_only: bool,
}

impl VisitorModifiers {
    /// The empty set.
    pub const fn empty() -> Self {
        Self {
            late: false,
            root_only: false,
        }
    }

    /// Returns a copy of this set with `modifier` added.
    pub const fn with(mut self, modifier: VisitorModifier) -> Self {
        match modifier {
            VisitorModifier::RunAsLateAsPossible => self.late = true,
            VisitorModifier::RunOnRootNodeOnly => self.root_only = true,
        }
        self
    }

    pub const fn contains(&self, modifier: VisitorModifier) -> bool {
        match modifier {
            VisitorModifier::RunAsLateAsPossible => self.late,
            VisitorModifier::RunOnRootNodeOnly => self.root_only,
        }
    }

    pub const fn is_empty(&self) -> bool {
        !self.late && !self.root_only
    }

    #[inline]
    pub const fn is_late(&self) -> bool {
        self.late
    }

    #[inline]
    pub const fn is_root_only(&self) -> bool {
        self.root_only
    }
}

impl From<VisitorModifier> for VisitorModifiers {
    fn from(modifier: VisitorModifier) -> Self {
        Self::empty().with(modifier)
    }
}

impl FromIterator<VisitorModifier> for VisitorModifiers {
    fn from_iter<I: IntoIterator<Item = VisitorModifier>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

/// A fault raised by a rule while visiting a node.
///
/// Faults abort the current walk and reach the caller unchanged.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RuleError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<TreeError> for RuleError {
    fn from(err: TreeError) -> Self {
        Self::with_source("tree edit failed", err)
    }
}

/// A unit of lint logic.
///
/// Rules are shared between concurrent invocations, so `visit` takes
/// `&self`; any per-run bookkeeping needs interior mutability.
///
/// # Example
///
/// ```rust
/// use ordolint_core::{Emitter, Rule, RuleError, VisitContext};
/// use ordolint_ast::NodeKind;
///
/// struct NoTabs;
///
/// impl Rule for NoTabs {
///     fn id(&self) -> &str {
///         "no-tabs"
///     }
///
///     fn visit(&self, ctx: &mut VisitContext<'_>, emit: &mut Emitter<'_>) -> Result<(), RuleError> {
///         let node = ctx.node();
///         if node.kind() != NodeKind::Whitespace || !node.text().is_some_and(|t| t.contains('\t')) {
///             return Ok(());
///         }
///         let (id, offset, fixed) = (node.id(), node.start_offset(), node.text().unwrap_or("").replace('\t', "    "));
///         emit.emit(offset, "Unexpected tab character", true);
///         if let Some(tree) = ctx.tree_mut() {
///             tree.set_text(id, fixed)?;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Identifier, unique within its rule set.
    fn id(&self) -> &str;

    /// Scheduling modifiers; empty by default.
    fn modifiers(&self) -> VisitorModifiers {
        VisitorModifiers::empty()
    }

    /// Inspects the current node, reporting findings through `emit`.
    ///
    /// When [`VisitContext::tree_mut`] yields the tree, the rule may fix
    /// the violation in place before returning.
    fn visit(&self, ctx: &mut VisitContext<'_>, emit: &mut Emitter<'_>) -> Result<(), RuleError>;
}

/// The node under visit plus the tree it lives in.
pub struct VisitContext<'t> {
    tree: &'t mut SyntaxTree,
    node: NodeId,
    auto_correct: bool,
}

impl<'t> VisitContext<'t> {
    pub(crate) fn new(tree: &'t mut SyntaxTree, node: NodeId, auto_correct: bool) -> Self {
        Self {
            tree,
            node,
            auto_correct,
        }
    }

    /// Returns a view of the node under visit.
    pub fn node(&self) -> NodeRef<'_> {
        self.tree.node(self.node)
    }

    pub fn node_id(&self) -> NodeId {
        self.node
    }

    pub fn is_root(&self) -> bool {
        self.node == self.tree.root()
    }

    pub fn tree(&self) -> &SyntaxTree {
        &*self.tree
    }

    /// Whether the caller asked for fixes on this visit.
    pub fn auto_correct(&self) -> bool {
        self.auto_correct
    }

    /// Mutable access to the tree, available only when autocorrecting.
    pub fn tree_mut(&mut self) -> Option<&mut SyntaxTree> {
        if self.auto_correct {
            Some(&mut *self.tree)
        } else {
            None
        }
    }
}

/// A namespaced, ordered collection of rules.
#[derive(Clone)]
pub struct RuleSet {
    namespace: String,
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            rules: Vec::new(),
        }
    }

    /// Creates a rule set from already shared rules.
    pub fn from_rules(namespace: impl Into<String>, rules: Vec<Arc<dyn Rule>>) -> Self {
        Self {
            namespace: namespace.into(),
            rules,
        }
    }

    /// Appends a rule, keeping declaration order.
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the id under which `rule_id` of this set is reported.
    pub fn qualified_id(&self, rule_id: &str) -> String {
        qualify(&self.namespace, rule_id)
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.rules.iter().map(|r| r.id()).collect();
        f.debug_struct("RuleSet")
            .field("namespace", &self.namespace)
            .field("rules", &ids)
            .finish()
    }
}

/// `standard` rules keep their bare id, others become `namespace:id`.
pub fn qualify(namespace: &str, rule_id: &str) -> String {
    if namespace == STANDARD_NAMESPACE {
        rule_id.to_string()
    } else {
        format!("{}:{}", namespace, rule_id)
    }
}

/// Lower-case words joined by single dashes, e.g. `no-wildcard-imports`.
pub fn is_valid_rule_id(id: &str) -> bool {
    !id.is_empty() && id.split('-').all(is_valid_word)
}

/// A single lower-case word, e.g. `standard` or `experimental`.
pub fn is_valid_namespace(namespace: &str) -> bool {
    is_valid_word(namespace)
}

fn is_valid_word(word: &str) -> bool {
    let mut chars = word.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}
