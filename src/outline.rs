//! Interactive projection: the collapsible outline and its expansion state.

use std::collections::HashSet;

use crate::tree::{Node, NodeId, RepoTree};

/// The set of expanded directory paths.
///
/// Owned by the caller, not by the tree: it survives tree rebuilds, and paths
/// that no longer exist simply match nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<String>,
}

impl ExpansionState {
    /// Empty state: every top-level directory starts collapsed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    /// Flip one directory. Paths that are absent from `tree`, or that name a
    /// leaf, are left alone. Returns whether the state changed.
    pub fn toggle(&mut self, tree: &RepoTree, path: &str) -> bool {
        if !is_container_path(tree, path) {
            return false;
        }
        if !self.expanded.remove(path) {
            self.expanded.insert(path.to_string());
        }
        true
    }

    /// Expand one directory if it is not already. Returns whether the state changed.
    pub fn expand(&mut self, tree: &RepoTree, path: &str) -> bool {
        is_container_path(tree, path) && self.expanded.insert(path.to_string())
    }

    /// Collapse one directory. Returns whether the state changed.
    pub fn collapse(&mut self, path: &str) -> bool {
        self.expanded.remove(path)
    }

    /// Expand every container in the tree, visible or not.
    pub fn expand_all(&mut self, tree: &RepoTree) {
        self.expanded = tree.container_paths().map(str::to_string).collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }
}

fn is_container_path(tree: &RepoTree, path: &str) -> bool {
    tree.find(path)
        .is_some_and(|id| tree.node(id).is_container())
}

/// One visible line of the outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row<'t> {
    pub id: NodeId,
    pub node: &'t Node,
    /// Nesting depth (0 = direct child of the root).
    pub depth: usize,
    /// Whether the node's children follow this row.
    pub expanded: bool,
    /// False on the last level a depth limit allows.
    descendable: bool,
}

impl Row<'_> {
    /// Whether the row shows an expand/collapse affordance. Empty
    /// directories, leaves, and rows on the last level of a depth limit
    /// never do.
    pub fn expandable(&self) -> bool {
        self.descendable && self.node.is_container() && self.node.has_children()
    }
}

/// Visible rows of the outline, depth-first, pre-order.
pub fn visible_rows<'t>(tree: &'t RepoTree, state: &ExpansionState) -> Vec<Row<'t>> {
    visible_rows_to_depth(tree, state, None)
}

/// Like [`visible_rows`], but never emits rows `max_depth` levels or more
/// below the root.
pub fn visible_rows_to_depth<'t>(
    tree: &'t RepoTree,
    state: &ExpansionState,
    max_depth: Option<usize>,
) -> Vec<Row<'t>> {
    let mut rows = Vec::new();
    collect_rows(tree, state, max_depth, RepoTree::ROOT, 0, &mut rows);
    rows
}

fn collect_rows<'t>(
    tree: &'t RepoTree,
    state: &ExpansionState,
    max_depth: Option<usize>,
    parent: NodeId,
    depth: usize,
    rows: &mut Vec<Row<'t>>,
) {
    if max_depth.is_some_and(|max| depth >= max) {
        return;
    }
    let descendable = max_depth.map_or(true, |max| depth + 1 < max);
    for id in tree.children(parent) {
        let node = tree.node(id);
        // Only containers are gated; a leaf never opens, even if inconsistent
        // input gave it children.
        let expanded = descendable && node.is_container() && state.is_expanded(&node.path);
        rows.push(Row {
            id,
            node,
            depth,
            expanded,
            descendable,
        });
        if expanded {
            collect_rows(tree, state, max_depth, id, depth + 1, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;

    fn sample() -> RepoTree {
        RepoTree::build(&[
            Entry::leaf("README.md", Some(10)),
            Entry::leaf("src/main.rs", Some(20)),
            Entry::leaf("src/util/fmt.rs", Some(30)),
            Entry::container("docs"),
        ])
    }

    fn paths(rows: &[Row<'_>]) -> Vec<String> {
        rows.iter().map(|r| r.node.path.clone()).collect()
    }

    #[test]
    fn collapsed_shows_top_level_only() {
        let tree = sample();
        let rows = visible_rows(&tree, &ExpansionState::new());
        assert_eq!(paths(&rows), ["docs", "src", "README.md"]);
        assert!(rows.iter().all(|r| r.depth == 0 && !r.expanded));
    }

    #[test]
    fn expanded_directory_precedes_its_children() {
        let tree = sample();
        let mut state = ExpansionState::new();
        assert!(state.toggle(&tree, "src"));
        let rows = visible_rows(&tree, &state);
        assert_eq!(
            paths(&rows),
            ["docs", "src", "src/util", "src/main.rs", "README.md"]
        );
        assert_eq!(rows[2].depth, 1);
        assert!(rows[1].expanded);
    }

    #[test]
    fn nested_expansion_needs_every_ancestor() {
        let tree = sample();
        let mut state = ExpansionState::new();
        state.toggle(&tree, "src/util");
        let rows = visible_rows(&tree, &state);
        assert!(!paths(&rows).contains(&"src/util/fmt.rs".to_string()));
    }

    #[test]
    fn empty_directory_has_no_affordance() {
        let tree = sample();
        let rows = visible_rows(&tree, &ExpansionState::new());
        let docs = rows.iter().find(|r| r.node.name == "docs").unwrap();
        assert!(!docs.expandable());
        let src = rows.iter().find(|r| r.node.name == "src").unwrap();
        assert!(src.expandable());
    }

    #[test]
    fn toggle_ignores_unknown_and_leaf_paths() {
        let tree = sample();
        let mut state = ExpansionState::new();
        assert!(!state.toggle(&tree, "nope"));
        assert!(!state.toggle(&tree, "README.md"));
        assert!(state.is_empty());
    }

    #[test]
    fn expand_all_then_collapse_all() {
        let tree = sample();
        let mut state = ExpansionState::new();
        state.expand_all(&tree);
        assert_eq!(state.len(), 3);
        assert_eq!(visible_rows(&tree, &state).len(), tree.len());

        state.collapse_all();
        assert!(state.is_empty());
        assert_eq!(visible_rows(&tree, &state).len(), 3);
    }

    #[test]
    fn depth_limit_cuts_expanded_rows() {
        let tree = sample();
        let mut state = ExpansionState::new();
        state.expand_all(&tree);
        let rows = visible_rows_to_depth(&tree, &state, Some(2));
        assert!(rows.iter().all(|r| r.depth < 2));
        assert!(paths(&rows).contains(&"src/util".to_string()));
        assert!(!paths(&rows).contains(&"src/util/fmt.rs".to_string()));
    }

    #[test]
    fn last_level_under_depth_limit_is_not_expandable() {
        let tree = RepoTree::build(&[Entry::leaf("a/b/c.txt", None)]);
        let mut state = ExpansionState::new();
        state.toggle(&tree, "a");

        let rows = visible_rows_to_depth(&tree, &state, Some(1));
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].expandable());
        assert!(!rows[0].expanded);

        let rows = visible_rows_to_depth(&tree, &state, Some(2));
        assert!(rows[0].expandable() && rows[0].expanded);
        assert_eq!(paths(&rows), ["a", "a/b"]);
        assert!(!rows[1].expandable());
    }

    #[test]
    fn leaf_with_children_never_opens() {
        let tree = RepoTree::build(&[Entry::leaf("a", None), Entry::leaf("a/b", None)]);
        assert_eq!(tree.len(), 2);
        let mut state = ExpansionState::new();
        state.expand_all(&tree);
        assert!(!state.toggle(&tree, "a"));

        let rows = visible_rows(&tree, &state);
        assert_eq!(paths(&rows), ["a"]);
        assert!(!rows[0].expandable());
    }
}
