//! # ordolint_ast
//!
//! Syntax tree definitions for ordolint.
//!
//! The tree is an arena of nodes addressed by [`NodeId`]. Unlike a
//! parse-once AST, it can be edited in place: autocorrecting rules replace
//! leaf text, insert or remove nodes while the engine walks the tree, and
//! the tree renders back to text afterwards.
//!
//! ## Architecture
//!
//! - Every node lives in a single `Vec` owned by [`SyntaxTree`]
//! - Only leaves carry text; a composite node's text is the concatenation
//!   of its leaves
//! - Trivia (byte-order mark, whitespace, comments) are ordinary leaves, so
//!   rendering an unmodified tree reproduces the input byte for byte
//! - Offsets are derived lazily and recomputed after each mutation
//!
//! ## Example
//!
//! ```rust
//! use ordolint_ast::{NodeKind, SyntaxTree};
//!
//! let mut tree = SyntaxTree::new();
//! let root = tree.root();
//! tree.push_leaf(root, NodeKind::Identifier, "fun").unwrap();
//! tree.push_leaf(root, NodeKind::Whitespace, " ").unwrap();
//! let name = tree.push_leaf(root, NodeKind::Identifier, "main").unwrap();
//!
//! assert_eq!(tree.start_offset(name), 4);
//! assert_eq!(tree.render(), "fun main");
//! ```

mod node;
mod node_kind;
mod span;
mod tree;
pub mod walk;

pub use node::NodeRef;
pub use node_kind::NodeKind;
pub use span::{Position, Span};
pub use tree::{NodeId, SyntaxTree, TreeError};

pub use walk::{VisitResult, walk_preorder};
