#![forbid(unsafe_code)]
//! repotree: rebuild the directory hierarchy of a flat repository listing,
//! browse it as a collapsible outline, and export it as a plain-text tree.

pub mod cli;
pub mod entry;
pub mod event_loop;
pub mod export;
pub mod highlight;
pub mod outline;
pub mod render;
pub mod session;
pub mod snapshot;
pub mod terminal;
pub mod tree;
pub mod watcher;

pub use entry::{Entry, EntryKind};
pub use outline::{visible_rows, ExpansionState, Row};
pub use tree::{Node, NodeId, RepoTree};
