//! The parsed tree and read-only navigation over it.

use crate::node::{Node, NodeId, NodeKind};
use crate::pool::NodePool;
use std::iter::FusedIterator;
use std::sync::Arc;

/// Indent of the synthetic root produced by multi-file aggregation.
pub const AGGREGATE_ROOT_INDENT: i32 = -2;

/// Indent of the root of a single-file tree.
pub const FILE_ROOT_INDENT: i32 = -1;

/// An arena of [`Node`] records plus the root handle.
///
/// The root always sits at [`CodeTree::ROOT`]. Dropping the tree (or calling
/// [`close`](Self::close)) hands every record back to the pool it was built
/// from; borrowing rules keep [`NodeRef`] handles from outliving that.
#[derive(Debug)]
pub struct CodeTree {
    nodes: Vec<Node>,
    pool: NodePool,
}

impl CodeTree {
    /// Handle of the root node.
    pub const ROOT: NodeId = NodeId::ROOT;

    pub(crate) fn from_parts(nodes: Vec<Node>, pool: NodePool) -> Self {
        debug_assert!(!nodes.is_empty(), "a tree always has a root");
        Self { nodes, pool }
    }

    /// Joins per-source trees under one synthetic root, in the given order.
    ///
    /// Each tree's arena is moved into the new arena with its handles re-based.
    pub(crate) fn aggregate(pool: NodePool, trees: Vec<CodeTree>) -> Self {
        let total = 1 + trees.iter().map(CodeTree::len).sum::<usize>();
        let mut nodes = Vec::with_capacity(total);

        let mut root = pool.acquire();
        root.kind = NodeKind::Root;
        root.indent = AGGREGATE_ROOT_INDENT;
        nodes.push(root);

        for mut tree in trees {
            let offset = nodes.len();
            for mut node in tree.nodes.drain(..) {
                node.parent = Some(node.parent.map_or(Self::ROOT, |p| p.offset(offset)));
                for child in &mut node.children {
                    *child = child.offset(offset);
                }
                nodes.push(node);
            }
            nodes[0].children.push(Self::ROOT.offset(offset));
        }

        Self::from_parts(nodes, pool)
    }

    /// Returns a navigation handle on the root.
    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: Self::ROOT,
        }
    }

    /// Returns a navigation handle on `id`, if it belongs to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.index() < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    /// Returns the raw record for `id`.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Returns the number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree holds nothing but its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Returns the name carried by the root, if any.
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        self.nodes[0].source_name.as_deref()
    }

    pub(crate) fn set_source_name(&mut self, name: Arc<str>) {
        self.nodes[0].source_name = Some(name);
    }

    /// Iterates over every node in preorder, root first.
    #[must_use]
    pub fn iter(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![Self::ROOT],
        }
    }

    /// Tears the tree down, returning every record to the pool.
    pub fn close(self) {
        drop(self);
    }

    fn record(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl Drop for CodeTree {
    fn drop(&mut self) {
        if !self.nodes.is_empty() {
            tracing::trace!(nodes = self.nodes.len(), "releasing tree");
            self.pool.release_all(self.nodes.drain(..));
        }
    }
}

/// Trees are equal when their arenas are equal, whichever pool they came from.
impl PartialEq for CodeTree {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl Eq for CodeTree {}

impl<'a> IntoIterator for &'a CodeTree {
    type Item = NodeRef<'a>;
    type IntoIter = Preorder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A borrowed handle on one node of a [`CodeTree`].
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a CodeTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// Returns this node's handle.
    #[must_use]
    pub fn id(self) -> NodeId {
        self.id
    }

    /// Returns the line text with indentation stripped.
    #[must_use]
    pub fn content(self) -> &'a str {
        &self.tree.record(self.id).content
    }

    /// Returns the node kind.
    #[must_use]
    pub fn kind(self) -> NodeKind {
        self.tree.record(self.id).kind
    }

    /// Returns the nesting depth.
    #[must_use]
    pub fn indent(self) -> i32 {
        self.tree.record(self.id).indent
    }

    /// Returns the 1-based line the node started on, or 0 for roots.
    #[must_use]
    pub fn line(self) -> usize {
        self.tree.record(self.id).line
    }

    /// Returns the source name of the nearest ancestor-or-self that has one.
    #[must_use]
    pub fn source_name(self) -> Option<&'a str> {
        let mut cursor = Some(self);
        while let Some(node) = cursor {
            if let Some(name) = node.tree.record(node.id).source_name.as_deref() {
                return Some(name);
            }
            cursor = node.parent();
        }
        None
    }

    /// Returns the parent, or `None` for the root.
    #[must_use]
    pub fn parent(self) -> Option<NodeRef<'a>> {
        self.tree.record(self.id).parent.map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }

    /// Returns the number of direct children.
    #[must_use]
    pub fn child_count(self) -> usize {
        self.tree.record(self.id).children.len()
    }

    /// Returns the `index`-th child.
    #[must_use]
    pub fn child(self, index: usize) -> Option<NodeRef<'a>> {
        let tree = self.tree;
        tree.record(self.id)
            .children
            .get(index)
            .map(|&id| NodeRef { tree, id })
    }

    /// Iterates over the direct children in source order.
    pub fn children(self) -> impl ExactSizeIterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        tree.record(self.id)
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    /// Returns `true` for the tree's root.
    #[must_use]
    pub fn is_root(self) -> bool {
        self.id == CodeTree::ROOT
    }
}

/// Preorder traversal over a [`CodeTree`].
#[derive(Debug)]
pub struct Preorder<'a> {
    tree: &'a CodeTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.record(id).children.iter().rev().copied());
        Some(NodeRef {
            tree: self.tree,
            id,
        })
    }
}

impl FusedIterator for Preorder<'_> {}
