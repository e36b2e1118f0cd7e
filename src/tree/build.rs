use tracing::debug;

use super::{Node, NodeId, RepoTree};
use crate::entry::{Entry, EntryKind};

impl RepoTree {
    /// Fold a flat entry list into a fresh tree.
    ///
    /// Ancestors that were never listed are synthesized as containers. The
    /// first entry to materialize a path owns its kind and size; later entries
    /// for the same path are ignored. Malformed paths are accepted as-is.
    pub fn build(entries: &[Entry]) -> Self {
        let mut tree = RepoTree::default();
        for entry in entries {
            tree.insert(entry);
        }
        debug!(entries = entries.len(), nodes = tree.len(), "built tree");
        tree
    }

    fn insert(&mut self, entry: &Entry) {
        let mut segments = entry.path.split('/').peekable();
        let mut current = Self::ROOT;

        while let Some(segment) = segments.next() {
            let terminal = segments.peek().is_none();

            if let Some(existing) = self.child(current, segment) {
                if terminal {
                    let node = &self.nodes[existing];
                    if node.kind != entry.kind || node.size != entry.size {
                        debug!(
                            path = %entry.path,
                            kept = ?node.kind,
                            ignored = ?entry.kind,
                            "conflicting entry for existing path, keeping first"
                        );
                    }
                }
                current = existing;
                continue;
            }

            let (kind, size) = if terminal {
                (entry.kind, entry.size)
            } else {
                (EntryKind::Container, None)
            };
            current = self.push_child(current, segment, kind, size);
        }
    }

    fn push_child(
        &mut self,
        parent: NodeId,
        name: &str,
        kind: EntryKind,
        size: Option<u64>,
    ) -> NodeId {
        let path = if parent == Self::ROOT {
            name.to_string()
        } else {
            format!("{}/{}", self.nodes[parent].path, name)
        };
        let id = self.nodes.len();
        self.nodes.push(Node::new(name, path, kind, size));
        self.nodes[parent].children.insert(name.to_string(), id);
        id
    }
}
