//! Highlighting of paths that appeared in the most recent reloads.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::tree::RepoTree;

/// How long a per-path highlight stays visible.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(3);

/// Tracks recently added node paths with per-entry expiration.
#[derive(Debug, Default)]
pub struct HighlightTracker {
    entries: HashMap<String, Instant>,
}

impl HighlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a path as highlighted at the given instant.
    pub fn insert(&mut self, path: String, now: Instant) {
        self.entries.insert(path, now);
    }

    /// Return the set of paths whose highlights have not yet expired.
    pub fn active_set(&mut self, now: Instant) -> HashSet<String> {
        self.entries
            .retain(|_, inserted| now.duration_since(*inserted) < HIGHLIGHT_DURATION);
        self.entries.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Node paths present in `new` but not in `old`.
pub fn added_paths(old: &RepoTree, new: &RepoTree) -> Vec<String> {
    let before: HashSet<&str> = old.descendants().map(|n| n.path.as_str()).collect();
    new.descendants()
        .filter(|n| !before.contains(n.path.as_str()))
        .map(|n| n.path.clone())
        .collect()
}
