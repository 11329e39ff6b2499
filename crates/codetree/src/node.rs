//! Tree node records.
//!
//! Nodes live in a per-tree arena and refer to each other through [`NodeId`]
//! handles, so parent links are plain indices rather than owning pointers.

use std::fmt;
use std::sync::Arc;

/// Handle to a node inside a [`CodeTree`](crate::CodeTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) const ROOT: Self = Self(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Returns the arena index of this node.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn offset(self, by: usize) -> Self {
        Self::new(self.index() + by)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node stands for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Synthetic root of a file tree or of an aggregate.
    #[default]
    Root,
    /// An ordinary code line.
    Line,
    /// A `//` line comment or a `/* ... */` block comment.
    Comment,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Line => write!(f, "line"),
            Self::Comment => write!(f, "comment"),
        }
    }
}

/// One logical unit of source: a code line, a comment, or a root.
///
/// Records are recycled through a [`NodePool`](crate::NodePool); a reused
/// record keeps the capacity of its `content` and `children` buffers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Line text with leading indentation stripped. Comments keep their delimiters.
    pub content: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Nesting depth. -1 for a file root, 0 for top-level lines.
    pub indent: i32,
    /// 1-based line the span started on. 0 for roots.
    pub line: usize,
    /// Source name, set on file roots and inherited by descendants.
    pub source_name: Option<Arc<str>>,
    /// Parent handle; `None` only for the tree root.
    pub parent: Option<NodeId>,
    /// Children in source order.
    pub children: Vec<NodeId>,
}

impl Node {
    /// Clears every field while keeping allocated buffers.
    pub fn reset(&mut self) {
        self.content.clear();
        self.kind = NodeKind::Root;
        self.indent = 0;
        self.line = 0;
        self.source_name = None;
        self.parent = None;
        self.children.clear();
    }
}
