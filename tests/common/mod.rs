#![allow(dead_code)]

use repotree::render::RenderConfig;
use repotree::{Entry, RepoTree};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Build entries from a list of paths.
/// Paths ending with '/' become containers; others become leaves without a size.
pub fn entries(paths: &[&str]) -> Vec<Entry> {
    paths
        .iter()
        .map(|p| match p.strip_suffix('/') {
            Some(dir) => Entry::container(dir),
            None => Entry::leaf(*p, None),
        })
        .collect()
}

/// Build a tree from a list of paths (see [`entries`]).
pub fn tree_of(paths: &[&str]) -> RepoTree {
    RepoTree::build(&entries(paths))
}

/// A small but realistic repository layout.
pub fn project_entries() -> Vec<Entry> {
    vec![
        Entry::container("src"),
        Entry::leaf("src/main.rs", Some(120)),
        Entry::leaf("src/lib.rs", Some(2048)),
        Entry::container("src/components"),
        Entry::leaf("src/components/button.rs", Some(512)),
        Entry::leaf("src/components/mod.rs", Some(40)),
        Entry::leaf("src/utils/helpers.rs", Some(300)),
        Entry::leaf("tests/integration.rs", Some(900)),
        Entry::container("docs"),
        Entry::leaf("Cargo.toml", Some(400)),
        Entry::leaf("README.md", Some(1500)),
        Entry::leaf(".gitignore", Some(8)),
    ]
}

/// RenderConfig with color disabled.
pub fn no_color_render_config() -> RenderConfig {
    RenderConfig {
        use_color: false,
        show_sizes: true,
    }
}

/// RenderConfig with color enabled.
pub fn color_render_config() -> RenderConfig {
    RenderConfig {
        use_color: true,
        show_sizes: true,
    }
}

/// Write a snapshot document into a fresh temp directory.
/// Returns the directory (keep it alive) and the snapshot path.
pub fn write_snapshot(json: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("snapshot.json");
    fs::write(&path, json).unwrap();
    (tmp, path)
}

/// Serialize entries as a wrapped snapshot document.
pub fn snapshot_json(repository: Option<&str>, entries: &[Entry]) -> String {
    let mut doc = serde_json::json!({ "tree": entries });
    if let Some(repo) = repository {
        doc["repository"] = serde_json::Value::String(repo.to_string());
    }
    doc.to_string()
}
