//! Hierarchy reconstruction from flat entries, and canonical sibling ordering.

mod build;
pub mod order;

use crate::entry::EntryKind;
use std::collections::HashMap;

/// Index of a node inside a [`RepoTree`] arena.
pub type NodeId = usize;

/// A single node of the reconstructed hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Final path segment.
    pub name: String,
    /// Full `/`-joined path from the root (empty for the root itself).
    pub path: String,
    pub kind: EntryKind,
    /// Byte size, only ever set from an explicit entry.
    pub size: Option<u64>,
    /// Children keyed by segment name. Display order is never stored here.
    children: HashMap<String, NodeId>,
}

impl Node {
    fn new(name: &str, path: String, kind: EntryKind, size: Option<u64>) -> Self {
        Self {
            name: name.to_string(),
            path,
            kind,
            size,
            children: HashMap::new(),
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// An immutable snapshot of the directory hierarchy implied by an entry list.
///
/// Nodes live in an arena; index 0 is the synthetic, pathless root which is
/// never rendered by either projection.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoTree {
    nodes: Vec<Node>,
}

impl RepoTree {
    /// Id of the synthetic root.
    pub const ROOT: NodeId = 0;

    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT]
    }

    /// Look up a node by id. Panics on ids not produced by this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Children of `id` in canonical order (directories first, then by name).
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        order::canonical_order(self, &self.nodes[id].children)
    }

    /// Direct child of `id` named `name`.
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[id].children.get(name).copied()
    }

    /// Resolve a `/`-separated path to its node, walking one segment at a time.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        path.split('/')
            .try_fold(Self::ROOT, |current, segment| self.child(current, segment))
    }

    /// Number of nodes, not counting the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every node except the root, in arena (creation) order.
    pub fn descendants(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().skip(1)
    }

    /// Paths of every container node in the tree.
    pub fn container_paths(&self) -> impl Iterator<Item = &str> {
        self.descendants()
            .filter(|n| n.is_container())
            .map(|n| n.path.as_str())
    }
}

impl Default for RepoTree {
    fn default() -> Self {
        Self {
            nodes: vec![Node::new("", String::new(), EntryKind::Container, None)],
        }
    }
}
