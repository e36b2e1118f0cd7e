//! Snapshot documents: reading entry lists from JSON and filtering them before a build.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::entry::Entry;

/// Default cap on the number of entries fed to the tree builder.
pub const DEFAULT_MAX_ENTRIES: usize = 500;

/// Errors raised while reading a snapshot document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{origin}: invalid snapshot: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A complete, already-retrieved list of repository entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Snapshot {
    /// `owner/repo` when the document names its repository.
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub tree: Vec<Entry>,
    /// Set by the GitHub API when the listing itself was cut short.
    #[serde(default)]
    pub truncated: bool,
}

impl Snapshot {
    pub fn from_entries(tree: Vec<Entry>) -> Self {
        Self {
            tree,
            ..Self::default()
        }
    }

    /// Display name: the part after the last `/` of `repository`.
    pub fn repo_name(&self) -> Option<&str> {
        let full = self.repository.as_deref()?.trim_end_matches('/');
        let name = full.rsplit('/').next().unwrap_or(full);
        (!name.is_empty()).then_some(name)
    }
}

/// Parse a snapshot from JSON text: either an object with a `tree` array, or
/// a bare array of entries. Objects without `tree` yield an empty snapshot.
pub fn parse_snapshot(text: &str, origin: &str) -> Result<Snapshot, LoadError> {
    let json_err = |source| LoadError::Json {
        origin: origin.to_string(),
        source,
    };
    let value: serde_json::Value = serde_json::from_str(text).map_err(json_err)?;
    if value.is_array() {
        let entries: Vec<Entry> = serde_json::from_value(value).map_err(json_err)?;
        Ok(Snapshot::from_entries(entries))
    } else {
        serde_json::from_value(value).map_err(json_err)
    }
}

/// Read a snapshot from any reader (e.g. stdin).
pub fn read_snapshot<R: Read>(mut reader: R, origin: &str) -> Result<Snapshot, LoadError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| LoadError::Io {
            path: PathBuf::from(origin),
            source,
        })?;
    parse_snapshot(&text, origin)
}

/// Read a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = parse_snapshot(&text, &path.display().to_string())?;
    debug!(path = %path.display(), entries = snapshot.tree.len(), "loaded snapshot");
    Ok(snapshot)
}

/// Abstraction over where snapshots come from, so the browser can reload them.
pub trait SnapshotLoader {
    fn load(&self) -> Result<Snapshot, LoadError>;
    /// Human-readable origin for status lines.
    fn describe(&self) -> String;
}

/// Rereads a snapshot file on every load.
pub struct FileLoader {
    pub path: PathBuf,
}

impl SnapshotLoader for FileLoader {
    fn load(&self) -> Result<Snapshot, LoadError> {
        load_snapshot(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves a snapshot that was read once, such as stdin input.
pub struct StaticLoader {
    pub snapshot: Snapshot,
    pub origin: String,
}

impl SnapshotLoader for StaticLoader {
    fn load(&self) -> Result<Snapshot, LoadError> {
        Ok(self.snapshot.clone())
    }

    fn describe(&self) -> String {
        self.origin.clone()
    }
}

/// Build a GlobSet from user patterns. Invalid patterns are skipped and logged.
pub fn build_ignore_set(user_patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    let mut invalid = Vec::new();
    for pattern in user_patterns {
        match Glob::new(pattern) {
            Ok(g) => {
                builder.add(g);
            }
            Err(_) => invalid.push(pattern.clone()),
        }
    }
    if !invalid.is_empty() {
        warn!(patterns = ?invalid, "invalid ignore pattern(s), skipped");
    }
    builder.build().unwrap_or_else(|e| {
        warn!(error = %e, "failed to build ignore set");
        GlobSet::empty()
    })
}

/// Boundary validation applied to an entry list before it reaches the tree builder.
#[derive(Debug, Clone)]
pub struct EntryFilter {
    /// Entries whose path or any ancestor path matches are dropped.
    pub ignore: GlobSet,
    /// Keep at most this many entries, in input order (`None` for unlimited).
    pub max_entries: Option<usize>,
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self {
            ignore: GlobSet::empty(),
            max_entries: None,
        }
    }
}

/// Result of [`EntryFilter::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filtered {
    pub entries: Vec<Entry>,
    /// Entries removed by ignore patterns.
    pub ignored: usize,
    /// Entries removed by the cap.
    pub dropped: usize,
}

impl EntryFilter {
    pub fn apply(&self, entries: Vec<Entry>) -> Filtered {
        let total = entries.len();
        let mut kept: Vec<Entry> = entries
            .into_iter()
            .filter(|e| !self.is_ignored(&e.path))
            .collect();
        let ignored = total - kept.len();

        let mut dropped = 0;
        if let Some(max) = self.max_entries {
            if kept.len() > max {
                dropped = kept.len() - max;
                kept.truncate(max);
            }
        }
        if ignored > 0 || dropped > 0 {
            debug!(ignored, dropped, kept = kept.len(), "filtered entries");
        }
        Filtered {
            entries: kept,
            ignored,
            dropped,
        }
    }

    fn is_ignored(&self, path: &str) -> bool {
        if self.ignore.is_empty() {
            return false;
        }
        // Match the path itself and every ancestor so "build" hides "build/out.o".
        path.match_indices('/')
            .map(|(i, _)| &path[..i])
            .chain(std::iter::once(path))
            .any(|p| self.ignore.is_match(p))
    }
}
