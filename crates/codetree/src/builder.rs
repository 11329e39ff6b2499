//! Tree placement: attaches finalized spans under the right parent.
//!
//! The builder keeps two cursors. `block` is the node currently open as a
//! parent; `last` is the node appended most recently. A new span at depth
//! `indent` lands as follows:
//!
//! - `block.indent + 1`: child of `block`.
//! - `block.indent + 2`: `last` becomes the block, span is its child. Only
//!   valid once `last` is a child of `block`, so the first line of a file
//!   cannot start two levels deep.
//! - `<= block.indent`: walk up from `block` to the ancestor at `indent - 1`.
//! - anything deeper is malformed.

use crate::error::{Error, Result};
use crate::node::{Node, NodeId, NodeKind};
use crate::pool::NodePool;
use crate::tree::{CodeTree, FILE_ROOT_INDENT};

pub(crate) struct TreeBuilder {
    nodes: Vec<Node>,
    block: NodeId,
    last: NodeId,
    pool: NodePool,
}

impl TreeBuilder {
    pub(crate) fn new(pool: NodePool) -> Self {
        let mut root = pool.acquire();
        root.kind = NodeKind::Root;
        root.indent = FILE_ROOT_INDENT;

        Self {
            nodes: vec![root],
            block: NodeId::ROOT,
            last: NodeId::ROOT,
            pool,
        }
    }

    /// Appends a span. Content is decoded lossily as UTF-8.
    pub(crate) fn push(
        &mut self,
        kind: NodeKind,
        indent: usize,
        line: usize,
        content: &[u8],
    ) -> Result<NodeId> {
        let text = String::from_utf8_lossy(content);
        let indent = i32::try_from(indent).unwrap_or(i32::MAX);

        let Some(parent) = self.resolve_parent(indent) else {
            return Err(Error::MalformedIndentation {
                line,
                content: text.into_owned(),
            });
        };

        let mut node = self.pool.acquire();
        node.content.push_str(&text);
        node.kind = kind;
        node.indent = indent;
        node.line = line;
        node.parent = Some(parent);

        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.index()].children.push(id);
        self.last = id;

        tracing::trace!(%id, %kind, indent, line, "placed node");
        Ok(id)
    }

    /// Moves the block cursor so a node at `indent` can be its child.
    fn resolve_parent(&mut self, indent: i32) -> Option<NodeId> {
        let block_indent = self.indent_of(self.block);

        if indent == block_indent + 1 {
            // Same block.
        } else if indent == block_indent + 2 && self.last != self.block {
            self.block = self.last;
        } else if indent <= block_indent {
            let mut cursor = self.block;
            loop {
                cursor = self.nodes[cursor.index()].parent?;
                if self.indent_of(cursor) == indent - 1 {
                    break;
                }
            }
            self.block = cursor;
        } else {
            return None;
        }

        Some(self.block)
    }

    fn indent_of(&self, id: NodeId) -> i32 {
        self.nodes[id.index()].indent
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn finish(mut self) -> CodeTree {
        let nodes = std::mem::take(&mut self.nodes);
        CodeTree::from_parts(nodes, self.pool.clone())
    }
}

impl Drop for TreeBuilder {
    fn drop(&mut self) {
        if !self.nodes.is_empty() {
            self.pool.release_all(self.nodes.drain(..));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(lines: &[(usize, &str)]) -> Result<CodeTree> {
        let mut builder = TreeBuilder::new(NodePool::new());
        for (number, (indent, text)) in lines.iter().enumerate() {
            builder.push(NodeKind::Line, *indent, number + 1, text.as_bytes())?;
        }
        Ok(builder.finish())
    }

    #[test]
    fn sibling_blocks() {
        let tree = build(&[(0, "parent1"), (1, "child1"), (0, "parent2"), (1, "child1")]).unwrap();

        let root = tree.root();
        assert_eq!(root.child_count(), 2);
        for parent in root.children() {
            assert_eq!(parent.child_count(), 1);
            assert_eq!(parent.child(0).unwrap().content(), "child1");
            assert_eq!(parent.child(0).unwrap().indent(), 1);
        }
    }

    #[test]
    fn one_level_jump_descends_into_last_node() {
        let tree = build(&[(0, "a"), (1, "b"), (2, "c"), (3, "d")]).unwrap();

        let d = tree.iter().last().unwrap();
        assert_eq!(d.content(), "d");
        assert_eq!(d.parent().unwrap().content(), "c");
        assert_eq!(d.parent().unwrap().parent().unwrap().content(), "b");
    }

    #[test]
    fn multi_level_dedent_finds_ancestor() {
        let tree = build(&[(0, "a"), (1, "b"), (2, "c"), (3, "d"), (1, "e"), (0, "f")]).unwrap();

        let a = tree.root().child(0).unwrap();
        let contents: Vec<_> = a.children().map(|n| n.content()).collect();
        assert_eq!(contents, ["b", "e"]);
        assert_eq!(tree.root().child(1).unwrap().content(), "f");
    }

    #[test]
    fn over_deep_indent_is_rejected() {
        let result = build(&[(0, "parent"), (3, "over-indented")]);
        match result {
            Err(Error::MalformedIndentation { line, content }) => {
                assert_eq!(line, 2);
                assert_eq!(content, "over-indented");
            }
            other => panic!("expected malformed indentation, got {other:?}"),
        }
    }

    #[test]
    fn first_line_may_not_skip_a_level() {
        let result = build(&[(1, "indented")]);
        assert!(matches!(result, Err(Error::MalformedIndentation { line: 1, .. })));
    }

    #[test]
    fn failed_build_returns_nodes_to_pool() {
        let pool = NodePool::new();
        let mut builder = TreeBuilder::new(pool.clone());
        builder.push(NodeKind::Line, 0, 1, b"a").unwrap();
        assert!(builder.push(NodeKind::Line, 4, 2, b"b").is_err());
        assert_eq!(builder.len(), 2);

        drop(builder);
        assert_eq!(pool.idle_len(), 2);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut builder = TreeBuilder::new(NodePool::new());
        builder.push(NodeKind::Line, 0, 1, b"caf\xff").unwrap();
        let tree = builder.finish();
        assert_eq!(tree.root().child(0).unwrap().content(), "caf\u{fffd}");
    }
}
