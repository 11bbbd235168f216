//! Arena-backed syntax tree.

use std::cell::OnceCell;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::{NodeKind, NodeRef, Span};

/// Handle of a node inside a [`SyntaxTree`].
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the arena index of this node.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}

/// Errors raised by structural tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A text operation targeted a composite node.
    #[error("node {0:?} is not a leaf")]
    NotALeaf(NodeId),

    /// A child was pushed under a leaf.
    #[error("node {0:?} cannot hold children")]
    NotComposite(NodeId),

    /// The kind does not fit the requested operation.
    #[error("kind {0:?} cannot be used here")]
    KindMismatch(NodeKind),

    /// The node was removed earlier.
    #[error("node {0:?} is detached from the tree")]
    Detached(NodeId),

    /// The root cannot be removed, replaced or given siblings.
    #[error("the root node cannot be moved or removed")]
    RootImmutable,

    /// Node ids and offsets are 32-bit.
    #[error("tree limit exceeded: {0}")]
    LimitExceeded(&'static str),
}

#[derive(Debug, Clone)]
struct Slot {
    kind: NodeKind,
    /// Leaf text; always empty for composite nodes.
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attached: bool,
}

/// A mutable syntax tree.
///
/// Nodes are never freed: removing a node detaches its subtree, which is
/// then skipped by walks and rendering.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    slots: Vec<Slot>,
    root: NodeId,
    revision: u64,
    layout: OnceCell<Vec<Span>>,
}

impl SyntaxTree {
    /// Creates a tree holding only an empty root.
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                kind: NodeKind::Root,
                text: String::new(),
                parent: None,
                children: Vec::new(),
                attached: true,
            }],
            root: NodeId(0),
            revision: 0,
            layout: OnceCell::new(),
        }
    }

    /// Returns the root node id.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns a borrowed view of `id`.
    #[inline]
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef::new(self, id)
    }

    /// Monotonic counter bumped by every effective mutation.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the kind of `id`.
    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.slot(id).kind
    }

    /// Returns the text of a leaf, `None` for composite nodes.
    pub fn leaf_text(&self, id: NodeId) -> Option<&str> {
        let slot = self.slot(id);
        if slot.kind.is_composite() {
            None
        } else {
            Some(&slot.text)
        }
    }

    /// Returns the parent of `id`, `None` for the root and detached nodes.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).parent
    }

    /// Returns the ordered children of `id`.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slot(id).children
    }

    /// Returns true while `id` is reachable from the root.
    #[inline]
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.slot(id).attached
    }

    /// Returns the sibling immediately before `id`.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&c| c == id)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    /// Returns the sibling immediately after `id`.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&c| c == id)?;
        siblings.get(index + 1).copied()
    }

    /// Returns the byte span covered by `id`.
    ///
    /// Detached nodes report an empty span at offset zero.
    pub fn span(&self, id: NodeId) -> Span {
        self.layout()[id.index()]
    }

    /// Returns the start byte offset of `id`.
    #[inline]
    pub fn start_offset(&self, id: NodeId) -> u32 {
        self.span(id).start
    }

    /// Returns the length in bytes of the rendered tree.
    #[inline]
    pub fn text_len(&self) -> u32 {
        self.span(self.root).end
    }

    /// Returns the number of attached nodes, root included.
    pub fn node_count(&self) -> usize {
        self.preorder().len()
    }

    /// Returns the attached nodes in depth-first pre-order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.slots.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Renders the whole tree back to text.
    pub fn render(&self) -> String {
        self.render_node(self.root)
    }

    /// Renders the subtree rooted at `id`.
    pub fn render_node(&self, id: NodeId) -> String {
        let mut out = String::with_capacity(self.span(id).len() as usize);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = self.slot(current);
            if slot.kind.is_composite() {
                stack.extend(slot.children.iter().rev().copied());
            } else {
                out.push_str(&slot.text);
            }
        }
        out
    }

    /// Appends a leaf as the last child of `parent`.
    pub fn push_leaf(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        text: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        if kind.is_composite() {
            return Err(TreeError::KindMismatch(kind));
        }
        self.push_child(parent, kind, text.into())
    }

    /// Appends an empty composite node as the last child of `parent`.
    pub fn push_node(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId, TreeError> {
        if !kind.is_composite() || kind == NodeKind::Root {
            return Err(TreeError::KindMismatch(kind));
        }
        self.push_child(parent, kind, String::new())
    }

    /// Replaces the text of a leaf.
    ///
    /// Returns `Ok(false)` without touching the revision when the text is
    /// unchanged.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<bool, TreeError> {
        self.ensure_attached(id)?;
        if self.kind(id).is_composite() {
            return Err(TreeError::NotALeaf(id));
        }
        let text = checked_text(text.into())?;
        if self.slot(id).text == text {
            return Ok(false);
        }
        self.slots[id.index()].text = text;
        self.touch();
        Ok(true)
    }

    /// Inserts a new leaf as the sibling immediately before `anchor`.
    pub fn insert_leaf_before(
        &mut self,
        anchor: NodeId,
        kind: NodeKind,
        text: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        self.insert_sibling(anchor, 0, kind, text.into())
    }

    /// Inserts a new leaf as the sibling immediately after `anchor`.
    pub fn insert_leaf_after(
        &mut self,
        anchor: NodeId,
        kind: NodeKind,
        text: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        self.insert_sibling(anchor, 1, kind, text.into())
    }

    /// Detaches `id` and its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.ensure_attached(id)?;
        let parent = self.parent(id).ok_or(TreeError::RootImmutable)?;
        self.slots[parent.index()].children.retain(|&c| c != id);
        self.slots[id.index()].parent = None;

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index()];
            slot.attached = false;
            stack.extend(slot.children.iter().copied());
        }
        self.touch();
        Ok(())
    }

    /// Replaces `id` and its subtree with a single new leaf.
    pub fn replace_with_leaf(
        &mut self,
        id: NodeId,
        kind: NodeKind,
        text: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        let leaf = self.insert_leaf_before(id, kind, text)?;
        self.remove(id)?;
        Ok(leaf)
    }

    fn insert_sibling(
        &mut self,
        anchor: NodeId,
        shift: usize,
        kind: NodeKind,
        text: String,
    ) -> Result<NodeId, TreeError> {
        if kind.is_composite() {
            return Err(TreeError::KindMismatch(kind));
        }
        self.ensure_attached(anchor)?;
        let parent = self.parent(anchor).ok_or(TreeError::RootImmutable)?;
        let position = self
            .children(parent)
            .iter()
            .position(|&c| c == anchor)
            .ok_or(TreeError::Detached(anchor))?;

        let id = self.alloc(kind, text, parent)?;
        self.slots[parent.index()]
            .children
            .insert(position + shift, id);
        self.touch();
        Ok(id)
    }

    fn push_child(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        text: String,
    ) -> Result<NodeId, TreeError> {
        self.ensure_attached(parent)?;
        if !self.kind(parent).is_composite() {
            return Err(TreeError::NotComposite(parent));
        }
        let id = self.alloc(kind, text, parent)?;
        self.slots[parent.index()].children.push(id);
        self.touch();
        Ok(id)
    }

    fn alloc(&mut self, kind: NodeKind, text: String, parent: NodeId) -> Result<NodeId, TreeError> {
        let id = next_id(self.slots.len())?;
        let text = checked_text(text)?;
        self.slots.push(Slot {
            kind,
            text,
            parent: Some(parent),
            children: Vec::new(),
            attached: true,
        });
        Ok(id)
    }

    fn ensure_attached(&self, id: NodeId) -> Result<(), TreeError> {
        if self.is_attached(id) {
            Ok(())
        } else {
            Err(TreeError::Detached(id))
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.layout = OnceCell::new();
    }

    #[inline]
    fn slot(&self, id: NodeId) -> &Slot {
        &self.slots[id.index()]
    }

    fn layout(&self) -> &[Span] {
        self.layout.get_or_init(|| {
            let mut spans = vec![Span::default(); self.slots.len()];
            let mut offset = 0u32;
            self.layout_node(self.root, &mut offset, &mut spans);
            spans
        })
    }

    fn layout_node(&self, id: NodeId, offset: &mut u32, spans: &mut [Span]) {
        let start = *offset;
        let slot = self.slot(id);
        if slot.kind.is_composite() {
            for &child in &slot.children {
                self.layout_node(child, offset, spans);
            }
        } else {
            *offset = offset.saturating_add(u32::try_from(slot.text.len()).unwrap_or(u32::MAX));
        }
        spans[id.index()] = Span::new(start, *offset);
    }
}

fn next_id(len: usize) -> Result<NodeId, TreeError> {
    u32::try_from(len)
        .map(NodeId)
        .map_err(|_| TreeError::LimitExceeded("more than u32::MAX nodes"))
}

fn checked_text(text: String) -> Result<String, TreeError> {
    check_text_len(text.len())?;
    Ok(text)
}

fn check_text_len(len: usize) -> Result<(), TreeError> {
    u32::try_from(len)
        .map(|_| ())
        .map_err(|_| TreeError::LimitExceeded("leaf text longer than u32::MAX bytes"))
}

impl Default for SyntaxTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for SyntaxTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.node(self.root).serialize(serializer)
    }
}
