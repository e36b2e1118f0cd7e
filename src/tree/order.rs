//! Canonical sibling order shared by both projections.
//!
//! Containers sort before leaves; names within a kind compare byte-wise
//! (`str::cmp`), so the order is case-sensitive and does not depend on the
//! platform locale.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::{Node, NodeId, RepoTree};

/// Comparison function for sibling nodes.
pub fn compare(a: &Node, b: &Node) -> Ordering {
    // Directories before files
    match (a.is_container(), b.is_container()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.cmp(&b.name),
    }
}

/// Order a children mapping. Recomputed on every call, never cached.
pub fn canonical_order(tree: &RepoTree, children: &HashMap<String, NodeId>) -> Vec<NodeId> {
    let mut ids: Vec<NodeId> = children.values().copied().collect();
    ids.sort_unstable_by(|&a, &b| compare(tree.node(a), tree.node(b)));
    ids
}
