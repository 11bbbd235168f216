//! Read-only pre-order traversal.
//!
//! Used by collaborators that need a quick scan over an unchanging tree
//! (e.g. collecting comment directives). The lint engine drives its own
//! walk because rules may edit the tree while it runs.
//!
//! # Example
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use ordolint_ast::{NodeKind, SyntaxTree, walk_preorder};
//!
//! let mut tree = SyntaxTree::new();
//! let root = tree.root();
//! tree.push_leaf(root, NodeKind::LineComment, "// hi").unwrap();
//!
//! let mut comments = Vec::new();
//! let _ = walk_preorder(&tree, |node| {
//!     if node.kind().is_comment() {
//!         comments.extend(node.text());
//!     }
//!     ControlFlow::Continue(())
//! });
//! assert_eq!(comments, vec!["// hi"]);
//! ```

use std::ops::ControlFlow;

use crate::{NodeRef, SyntaxTree};

/// Result of visiting a node: `Break` stops the walk.
pub type VisitResult = ControlFlow<()>;

/// Calls `f` for every attached node in depth-first pre-order.
pub fn walk_preorder<'t, F>(tree: &'t SyntaxTree, mut f: F) -> VisitResult
where
    F: FnMut(NodeRef<'t>) -> VisitResult,
{
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        f(tree.node(id))?;
        stack.extend(tree.children(id).iter().rev().copied());
    }
    ControlFlow::Continue(())
}
