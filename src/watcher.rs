//! Snapshot file watcher using `notify-debouncer-full` with crossbeam channels.

use crossbeam_channel::{self, Receiver, Sender};
use notify::RecommendedWatcher;
use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, Debouncer, RecommendedCache};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Events emitted by the snapshot watcher.
#[derive(Debug)]
pub enum WatchEvent {
    /// The snapshot file was written or replaced.
    Changed,
    /// The snapshot file no longer exists.
    SourceRemoved,
    /// A watcher error occurred.
    Error(String),
}

/// Start watching a snapshot file. Returns the debouncer (must be kept alive!) and a receiver.
///
/// The parent directory is watched rather than the file itself so that
/// editors and tools that replace the file atomically are still observed.
pub fn start_watcher(
    file: &Path,
    debounce_ms: u64,
) -> Result<(Debouncer<RecommendedWatcher, RecommendedCache>, Receiver<WatchEvent>), String> {
    let file = file
        .canonicalize()
        .map_err(|e| format!("{}: {}", file.display(), e))?;
    let dir = file
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| format!("{}: has no parent directory", file.display()))?;
    let file_name = file.file_name().map(|n| n.to_os_string());

    let (tx, rx): (Sender<WatchEvent>, Receiver<WatchEvent>) = crossbeam_channel::unbounded();
    let watched = file.clone();

    let mut debouncer = new_debouncer(
        Duration::from_millis(debounce_ms),
        None,
        move |result: Result<Vec<notify_debouncer_full::DebouncedEvent>, Vec<notify::Error>>| {
            match result {
                Ok(events) => {
                    let touches_file = events.iter().any(|e| {
                        e.paths
                            .iter()
                            .any(|p: &PathBuf| p.file_name() == file_name.as_deref())
                    });
                    if !touches_file {
                        return;
                    }
                    debug!(path = %watched.display(), "snapshot changed on disk");
                    if std::fs::metadata(&watched).is_err() {
                        let _ = tx.send(WatchEvent::SourceRemoved);
                    } else {
                        let _ = tx.send(WatchEvent::Changed);
                    }
                }
                Err(errors) => {
                    for error in errors {
                        let _ = tx.send(WatchEvent::Error(format!("{}", error)));
                    }
                }
            }
        },
    )
    .map_err(|e| format!("Failed to create debouncer: {}", e))?;

    debouncer
        .watch(&dir, RecursiveMode::NonRecursive)
        .map_err(|e| format!("Failed to watch path {}: {}", dir.display(), e))?;

    Ok((debouncer, rx))
}
