//! Browsing session: the current tree snapshot, the caller-owned expansion
//! state, and the cursor over the visible outline.

use std::time::Instant;
use tracing::{info, warn};

use crate::export;
use crate::highlight::{added_paths, HighlightTracker};
use crate::outline::{visible_rows_to_depth, ExpansionState, Row};
use crate::snapshot::{EntryFilter, LoadError, SnapshotLoader};
use crate::tree::RepoTree;

/// A freshly built tree plus what the filter did to its input.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub tree: RepoTree,
    /// Display name taken from the snapshot document, if it carries one.
    pub repo_name: Option<String>,
    /// Entries in the snapshot document.
    pub total_entries: usize,
    /// Entries that reached the tree builder.
    pub kept_entries: usize,
}

impl Loaded {
    pub fn is_truncated(&self) -> bool {
        self.kept_entries < self.total_entries
    }
}

/// Load, filter, and build in one step.
pub fn load_tree(loader: &dyn SnapshotLoader, filter: &EntryFilter) -> Result<Loaded, LoadError> {
    let snapshot = loader.load()?;
    if snapshot.truncated {
        warn!(source = %loader.describe(), "listing was truncated by its provider");
    }
    let repo_name = snapshot.repo_name().map(str::to_string);
    let total_entries = snapshot.tree.len();
    let filtered = filter.apply(snapshot.tree);
    let tree = RepoTree::build(&filtered.entries);
    Ok(Loaded {
        tree,
        repo_name,
        total_entries,
        kept_entries: filtered.entries.len(),
    })
}

pub struct Session {
    tree: RepoTree,
    expansion: ExpansionState,
    max_depth: Option<usize>,
    repo_name: String,
    total_entries: usize,
    kept_entries: usize,
    cursor: usize,
    highlights: HighlightTracker,
    pub message: Option<String>,
}

impl Session {
    pub fn new(loaded: Loaded, repo_name: String, max_depth: Option<usize>) -> Self {
        Self {
            tree: loaded.tree,
            expansion: ExpansionState::new(),
            max_depth,
            repo_name,
            total_entries: loaded.total_entries,
            kept_entries: loaded.kept_entries,
            cursor: 0,
            highlights: HighlightTracker::new(),
            message: None,
        }
    }

    pub fn tree(&self) -> &RepoTree {
        &self.tree
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// `(kept, total)` entry counts of the current snapshot.
    pub fn entry_counts(&self) -> (usize, usize) {
        (self.kept_entries, self.total_entries)
    }

    pub fn rows(&self) -> Vec<Row<'_>> {
        visible_rows_to_depth(&self.tree, &self.expansion, self.max_depth)
    }

    pub fn selected_path(&self) -> Option<String> {
        self.rows().get(self.cursor).map(|r| r.node.path.clone())
    }

    /// Swap in a rebuilt tree. The expansion state is kept; the cursor stays
    /// on the same path when it still exists, and new paths are highlighted.
    pub fn replace_tree(&mut self, loaded: Loaded, now: Instant) {
        let selected = self.selected_path();
        for path in added_paths(&self.tree, &loaded.tree) {
            self.highlights.insert(path, now);
        }
        info!(
            nodes = loaded.tree.len(),
            kept = loaded.kept_entries,
            total = loaded.total_entries,
            "snapshot reloaded"
        );
        self.tree = loaded.tree;
        self.total_entries = loaded.total_entries;
        self.kept_entries = loaded.kept_entries;

        let rows = self.rows();
        self.cursor = selected
            .and_then(|p| rows.iter().position(|r| r.node.path == p))
            .unwrap_or(self.cursor)
            .min(rows.len().saturating_sub(1));
    }

    pub fn highlighted(&mut self, now: Instant) -> std::collections::HashSet<String> {
        self.highlights.active_set(now)
    }

    pub fn move_by(&mut self, delta: isize) {
        let last = self.rows().len().saturating_sub(1);
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.rows().len().saturating_sub(1);
    }

    /// Path of the selected row when it can open or close.
    fn expandable_selection(&self) -> Option<String> {
        self.rows()
            .get(self.cursor)
            .filter(|r| r.expandable())
            .map(|r| r.node.path.clone())
    }

    /// Toggle the directory under the cursor. Toggling only adds or removes
    /// rows after the cursor, so the cursor index stays valid.
    pub fn toggle_selected(&mut self) -> bool {
        match self.expandable_selection() {
            Some(path) => self.expansion.toggle(&self.tree, &path),
            None => false,
        }
    }

    pub fn expand_selected(&mut self) -> bool {
        match self.expandable_selection() {
            Some(path) => self.expansion.expand(&self.tree, &path),
            None => false,
        }
    }

    /// Collapse the directory under the cursor, or move to its parent row
    /// when there is nothing to collapse.
    pub fn collapse_selected(&mut self) {
        let rows = self.rows();
        let Some(row) = rows.get(self.cursor) else {
            return;
        };
        if row.expanded {
            let path = row.node.path.clone();
            self.expansion.collapse(&path);
            return;
        }
        let depth = row.depth;
        let parent = rows[..self.cursor]
            .iter()
            .rposition(|r| r.depth + 1 == depth);
        if let Some(parent) = parent {
            self.cursor = parent;
        }
    }

    /// Expand everything, keeping the cursor on the selected path.
    pub fn expand_all(&mut self) {
        let selected = self.selected_path();
        self.expansion.expand_all(&self.tree);
        let rows = self.rows();
        if let Some(pos) = selected.and_then(|p| rows.iter().position(|r| r.node.path == p)) {
            self.cursor = pos;
        }
    }

    /// Collapse everything, keeping the cursor on the top-level ancestor of
    /// the selected row.
    pub fn collapse_all(&mut self) {
        let top = self
            .selected_path()
            .map(|p| p.split('/').next().unwrap_or_default().to_string());
        self.expansion.collapse_all();
        let rows = self.rows();
        self.cursor = top
            .and_then(|t| rows.iter().position(|r| r.node.path == t))
            .unwrap_or(0);
    }

    /// Fully expanded plain-text rendering of the current tree.
    pub fn export(&self) -> String {
        export::serialize(&self.tree, &self.repo_name)
    }
}
