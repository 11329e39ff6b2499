//! Reusable node records.
//!
//! Building a tree pulls one [`Node`] per line from a [`NodePool`] and tearing
//! it down hands every record back. Recycled records keep their string and
//! child-list buffers, so steady-state parsing stops allocating per node.
//!
//! # Examples
//!
//! ```
//! use codetree::NodePool;
//!
//! let pool = NodePool::new();
//!
//! let mut node = pool.acquire();
//! node.content.push_str("parent1");
//! pool.release(node);
//!
//! assert_eq!(pool.idle_len(), 1);
//! let reused = pool.acquire();
//! assert!(reused.content.is_empty());
//! assert!(pool.is_empty());
//! ```

use crate::node::Node;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Default number of idle records a pool keeps.
pub const DEFAULT_MAX_RETAINED: usize = 4096;

/// A thread-safe pool of [`Node`] records.
///
/// `NodePool` is a cheap handle around shared storage: clones refer to the
/// same pool, so one pool can serve many concurrent parses. Reuse order is
/// unspecified.
///
/// # Memory Management
///
/// At most `max_retained` idle records are kept. Records released beyond that
/// limit are dropped, which keeps the pool's footprint bounded under repeated
/// build/teardown cycles.
#[derive(Debug, Clone)]
pub struct NodePool {
    inner: Arc<PoolInner>,
}

#[derive(Debug)]
struct PoolInner {
    free: Mutex<Vec<Node>>,
    max_retained: usize,
}

impl NodePool {
    /// Creates an empty pool with the default retention limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_retained(DEFAULT_MAX_RETAINED)
    }

    /// Creates an empty pool that keeps at most `max_retained` idle records.
    #[must_use]
    pub fn with_max_retained(max_retained: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                free: Mutex::new(Vec::new()),
                max_retained,
            }),
        }
    }

    /// Takes a record out of the pool, allocating a fresh one if none is idle.
    ///
    /// The record is reset, and it is not shared with any other acquired record.
    #[must_use]
    pub fn acquire(&self) -> Node {
        if let Some(node) = self.lock().pop() {
            tracing::trace!("reusing pooled node");
            node
        } else {
            tracing::trace!("allocating node");
            Node::default()
        }
    }

    /// Returns a single record to the pool.
    ///
    /// Only the record itself is returned: child handles are plain indices and
    /// the children remain wherever they are.
    pub fn release(&self, mut node: Node) {
        node.reset();
        let mut free = self.lock();
        if free.len() < self.inner.max_retained {
            free.push(node);
        }
    }

    /// Returns many records at once, taking the lock a single time.
    pub fn release_all(&self, nodes: impl IntoIterator<Item = Node>) {
        let mut free = self.lock();
        let room = self.inner.max_retained.saturating_sub(free.len());
        free.extend(nodes.into_iter().take(room).map(|mut node| {
            node.reset();
            node
        }));
    }

    /// Returns the number of idle records.
    #[must_use]
    pub fn idle_len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no idle records are available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.idle_len() == 0
    }

    /// Returns the retention limit.
    #[must_use]
    pub fn max_retained(&self) -> usize {
        self.inner.max_retained
    }

    // Idle records are reset on release, so a panic while the lock was held
    // cannot leave the pool in an unusable state.
    fn lock(&self) -> MutexGuard<'_, Vec<Node>> {
        self.inner
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NodePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    #[test]
    fn new_pool_is_empty() {
        let pool = NodePool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.max_retained(), DEFAULT_MAX_RETAINED);
    }

    #[test]
    fn acquire_from_empty_pool_allocates() {
        let pool = NodePool::new();
        let node = pool.acquire();
        assert_eq!(node, Node::default());
        assert!(pool.is_empty());
    }

    #[test]
    fn released_node_is_reset_and_reused() {
        let pool = NodePool::new();
        let mut node = pool.acquire();
        node.content.push_str("parent1");
        node.kind = NodeKind::Line;
        node.indent = 2;
        let capacity = node.content.capacity();

        pool.release(node);
        assert_eq!(pool.idle_len(), 1);

        let reused = pool.acquire();
        assert!(reused.content.is_empty());
        assert_eq!(reused.content.capacity(), capacity);
        assert_eq!(reused.kind, NodeKind::Root);
        assert_eq!(reused.indent, 0);
    }

    #[test]
    fn clones_share_storage() {
        let pool = NodePool::new();
        let clone = pool.clone();

        pool.release(Node::default());
        assert_eq!(clone.idle_len(), 1);
    }

    #[test]
    fn release_respects_retention_limit() {
        let pool = NodePool::with_max_retained(2);
        for _ in 0..5 {
            pool.release(Node::default());
        }
        assert_eq!(pool.idle_len(), 2);
    }

    #[test]
    fn release_all_respects_retention_limit() {
        let pool = NodePool::with_max_retained(3);
        pool.release(Node::default());
        pool.release_all((0..10).map(|_| Node::default()));
        assert_eq!(pool.idle_len(), 3);
    }

    #[test]
    fn concurrent_acquire_and_release() {
        let pool = NodePool::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = pool.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let node = pool.acquire();
                        pool.release(node);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(pool.idle_len() <= 8);
        assert!(!pool.is_empty());
    }
}
