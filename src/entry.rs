//! Flat input records describing one path of a repository snapshot.

use serde::{Deserialize, Serialize};

/// Whether an entry is file-like or directory-like.
///
/// Serialized with the git object type names used by the GitHub trees API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// A terminal, non-directory entry. Submodule gitlinks (`"commit"`) are read as leaves.
    #[serde(rename = "blob", alias = "commit")]
    Leaf,
    /// A directory-like entry that may own children.
    #[serde(rename = "tree")]
    Container,
}

impl EntryKind {
    pub fn is_container(self) -> bool {
        self == EntryKind::Container
    }
}

/// One flat input record: a `/`-separated path, its kind, and an optional byte size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl Entry {
    pub fn leaf(path: impl Into<String>, size: Option<u64>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Leaf,
            size,
        }
    }

    pub fn container(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Container,
            size: None,
        }
    }
}
