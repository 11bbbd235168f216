//! Borrowed node view.

use serde::Serialize;

use crate::{NodeId, NodeKind, Span, SyntaxTree};

/// A read-only view of one node of a [`SyntaxTree`].
///
/// `NodeRef` is `Copy`; navigation methods return further views tied to
/// the same borrow of the tree.
///
/// # Example
///
/// ```rust
/// use ordolint_ast::{NodeKind, SyntaxTree};
///
/// let mut tree = SyntaxTree::new();
/// let root = tree.root();
/// let word = tree.push_leaf(root, NodeKind::Identifier, "hello").unwrap();
///
/// let node = tree.node(word);
/// assert_eq!(node.text(), Some("hello"));
/// assert!(node.parent().is_some_and(|p| p.is_root()));
/// ```
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    #[inline]
    pub(crate) fn new(tree: &'t SyntaxTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    /// Returns the id of this node.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the tree this node belongs to.
    #[inline]
    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.tree.kind(self.id)
    }

    /// Returns true if this is the tree root.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.tree.root() == self.id
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        !self.kind().is_composite()
    }

    /// Leaf text; `None` for composite nodes.
    #[inline]
    pub fn text(&self) -> Option<&'t str> {
        self.tree.leaf_text(self.id)
    }

    /// Rendered text of the whole subtree.
    pub fn full_text(&self) -> String {
        self.tree.render_node(self.id)
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.tree.span(self.id)
    }

    #[inline]
    pub fn start_offset(&self) -> u32 {
        self.span().start
    }

    #[inline]
    pub fn text_len(&self) -> u32 {
        self.span().len()
    }

    pub fn parent(&self) -> Option<NodeRef<'t>> {
        self.tree.parent(self.id).map(|id| self.tree.node(id))
    }

    /// Iterates over the direct children in order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeRef<'t>> + use<'t> {
        let tree = self.tree;
        tree.children(self.id).iter().map(move |&id| tree.node(id))
    }

    pub fn first_child(&self) -> Option<NodeRef<'t>> {
        self.children().next()
    }

    pub fn last_child(&self) -> Option<NodeRef<'t>> {
        self.children().next_back()
    }

    pub fn prev_sibling(&self) -> Option<NodeRef<'t>> {
        self.tree.prev_sibling(self.id).map(|id| self.tree.node(id))
    }

    pub fn next_sibling(&self) -> Option<NodeRef<'t>> {
        self.tree.next_sibling(self.id).map(|id| self.tree.node(id))
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("span", &self.span())
            .finish()
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let span = self.span();
        let composite = self.kind().is_composite();

        let mut state = serializer.serialize_struct("Node", 3)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("range", &[span.start, span.end])?;
        if composite {
            let children: Vec<NodeRef<'_>> = self.children().collect();
            state.serialize_field("children", &children)?;
        } else {
            state.serialize_field("text", &self.text())?;
        }
        state.end()
    }
}
