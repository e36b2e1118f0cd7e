//! Textual projection: the fully expanded, connector-decorated tree for copy/paste.
//!
//! Ignores any expansion state; every node of the tree contributes exactly one line.

use std::fmt::Write as _;

use crate::tree::{NodeId, RepoTree};

const BRANCH: &str = "\u{251c}\u{2500}\u{2500} "; // ├──
const LAST_BRANCH: &str = "\u{2514}\u{2500}\u{2500} "; // └──
const PIPE: &str = "\u{2502}   "; // │
const BLANK: &str = "    ";

/// Render the whole tree under a `"<repo_name>/"` header line.
///
/// Every line, including the last, ends with `\n`.
pub fn serialize(tree: &RepoTree, repo_name: &str) -> String {
    let mut out = String::new();
    out.push_str(repo_name);
    out.push_str("/\n");

    let mut prefix = String::new();
    write_children(&mut out, tree, RepoTree::ROOT, &mut prefix);
    out
}

/// Write the children of `parent`, each preceded by `prefix` and a connector.
/// `prefix` is restored to its original contents before returning.
fn write_children(out: &mut String, tree: &RepoTree, parent: NodeId, prefix: &mut String) {
    let children = tree.children(parent);
    let count = children.len();

    for (i, id) in children.into_iter().enumerate() {
        let node = tree.node(id);
        let is_last = i + 1 == count;
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        let suffix = if node.is_container() { "/" } else { "" };
        let _ = writeln!(out, "{prefix}{connector}{}{suffix}", node.name);

        // Leaves can own children only through inconsistent input; they are still listed.
        if node.has_children() {
            let restore = prefix.len();
            prefix.push_str(if is_last { BLANK } else { PIPE });
            write_children(out, tree, id, prefix);
            prefix.truncate(restore);
        }
    }
}

/// Number of node lines in an export, excluding the header.
pub fn node_line_count(text: &str) -> usize {
    text.lines().count().saturating_sub(1)
}
