//! Main event loop: multiplexes snapshot reloads and keyboard input.

use crate::export;
use crate::render::{help_bar_line, rows_to_lines, status_bar_line, truncation_line, RenderConfig};
use crate::session::{load_tree, Session};
use crate::snapshot::{EntryFilter, SnapshotLoader};
use crate::terminal::Tui;
use crate::watcher::WatchEvent;
use crossbeam_channel::{never, select, Receiver};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout};
use ratatui::text::Text;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// What the loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Reload,
    Export,
}

/// How the browser ended.
#[derive(Debug, Default)]
pub struct Outcome {
    /// Textual projection requested with the export key, printed after the
    /// terminal is restored.
    pub export: Option<String>,
}

/// Mutable state for the render loop that is not part of the session.
struct View {
    /// First visible row.
    offset: usize,
    /// Tree rows that fit on screen at the last draw.
    page: usize,
}

/// Apply a key press to the session.
pub fn handle_key(session: &mut Session, key: KeyEvent, page: usize) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::None;
    }
    let page = page.max(1) as isize;
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Action::Quit
        }
        KeyCode::Up | KeyCode::Char('k') => session.move_by(-1),
        KeyCode::Down | KeyCode::Char('j') => session.move_by(1),
        KeyCode::PageUp => session.move_by(-page),
        KeyCode::PageDown => session.move_by(page),
        KeyCode::Home | KeyCode::Char('g') => session.move_to_start(),
        KeyCode::End | KeyCode::Char('G') => session.move_to_end(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            session.toggle_selected();
        }
        KeyCode::Right | KeyCode::Char('l') => {
            session.expand_selected();
        }
        KeyCode::Left | KeyCode::Char('h') => session.collapse_selected(),
        KeyCode::Char('e') => session.expand_all(),
        KeyCode::Char('c') => session.collapse_all(),
        KeyCode::Char('r') => return Action::Reload,
        KeyCode::Char('x') => return Action::Export,
        _ => {}
    }
    Action::None
}

/// Run the browser. Blocks until the user quits.
///
/// `watch_rx` delivers snapshot file events; pass `None` when the source
/// cannot change (stdin) or watching is disabled.
pub fn run(
    terminal: &mut Tui,
    session: &mut Session,
    loader: &dyn SnapshotLoader,
    filter: &EntryFilter,
    render_config: &RenderConfig,
    watch_rx: Option<Receiver<WatchEvent>>,
) -> io::Result<Outcome> {
    let shutdown = Arc::new(AtomicBool::new(false));

    // Spawn keyboard input reader
    let (key_tx, key_rx) = crossbeam_channel::unbounded();
    let shutdown_clone = shutdown.clone();
    let input_handle = thread::spawn(move || {
        while !shutdown_clone.load(Ordering::Relaxed) {
            // Poll with a timeout so we can check the shutdown flag
            if event::poll(Duration::from_millis(100)).unwrap_or(false) {
                if let Ok(evt) = event::read() {
                    if key_tx.send(evt).is_err() {
                        break;
                    }
                }
            }
        }
    });

    let fs_rx = watch_rx.unwrap_or_else(never);
    // Redraw periodically so highlights expire without input.
    let ticker = crossbeam_channel::tick(Duration::from_millis(500));
    let mut view = View { offset: 0, page: 1 };
    let mut outcome = Outcome::default();

    let reload = |session: &mut Session| match load_tree(loader, filter) {
        Ok(loaded) => {
            let now = Instant::now();
            session.message = Some(format!("Reloaded at {}", clock_now()));
            session.replace_tree(loaded, now);
        }
        Err(e) => {
            warn!(error = %e, "reload failed, keeping previous tree");
            session.message = Some(format!("Reload failed: {}", e));
        }
    };

    loop {
        terminal.draw(|frame| draw(frame, session, render_config, loader, &mut view))?;

        select! {
            recv(fs_rx) -> msg => {
                match msg {
                    Ok(WatchEvent::Changed) => reload(session),
                    Ok(WatchEvent::SourceRemoved) => {
                        session.message = Some("Snapshot file removed; showing last tree".into());
                    }
                    Ok(WatchEvent::Error(e)) => {
                        warn!(error = %e, "watcher error");
                        session.message = Some(format!("Watcher error: {}", e));
                    }
                    Err(_) => {
                        // Watcher thread died; keep browsing the current tree.
                        debug!("watcher channel closed");
                        session.message = Some("Watcher stopped".into());
                    }
                }
            }
            recv(key_rx) -> msg => {
                match msg {
                    Ok(Event::Key(key)) => match handle_key(session, key, view.page) {
                        Action::Quit => break,
                        Action::Reload => reload(session),
                        Action::Export => {
                            let text = session.export();
                            session.message = Some(format!(
                                "Exported {} lines (printed on exit)",
                                export::node_line_count(&text) + 1
                            ));
                            outcome.export = Some(text);
                        }
                        Action::None => {}
                    },
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
            recv(ticker) -> _ => {}
        }
    }

    // Signal shutdown to input thread and wait
    shutdown.store(true, Ordering::Relaxed);
    let _ = input_handle.join();

    Ok(outcome)
}

fn draw(
    frame: &mut Frame,
    session: &mut Session,
    render_config: &RenderConfig,
    loader: &dyn SnapshotLoader,
    view: &mut View,
) {
    let (kept, total) = session.entry_counts();
    let truncated = kept < total;
    let [tree_area, status_area, help_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(if truncated { 2 } else { 1 }),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let page = tree_area.height as usize;
    let cursor = session.cursor();
    view.page = page;
    if cursor < view.offset {
        view.offset = cursor;
    } else if page > 0 && cursor >= view.offset + page {
        view.offset = cursor + 1 - page;
    }

    let highlighted = session.highlighted(Instant::now());
    let rows = session.rows();
    let end = (view.offset + page).min(rows.len());
    let start = view.offset.min(end);
    let selected = cursor.checked_sub(start);
    let lines = rows_to_lines(&rows[start..end], render_config, &highlighted, selected);
    frame.render_widget(Paragraph::new(Text::from(lines)), tree_area);

    let entry_info = format!("{} nodes, {} visible", session.tree().len(), rows.len());
    let mut status = Vec::new();
    if truncated {
        status.push(truncation_line(kept, total));
    }
    status.push(status_bar_line(
        &loader.describe(),
        &entry_info,
        session.message.as_deref(),
    ));
    frame.render_widget(Paragraph::new(Text::from(status)), status_area);
    frame.render_widget(Paragraph::new(help_bar_line()), help_area);
}

/// Wall-clock time of day for the status bar.
fn clock_now() -> String {
    use std::time::SystemTime;
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = now.as_secs();
    // HH:MM:SS in UTC
    let h = (secs % 86400) / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use crate::session::Loaded;
    use crate::tree::RepoTree;

    fn session() -> Session {
        let entries = [
            Entry::leaf("src/main.rs", None),
            Entry::leaf("src/lib.rs", None),
            Entry::leaf("README.md", None),
        ];
        Session::new(
            Loaded {
                tree: RepoTree::build(&entries),
                repo_name: None,
                total_entries: 3,
                kept_entries: 3,
            },
            "demo".into(),
            None,
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit_keys() {
        let mut s = session();
        assert_eq!(handle_key(&mut s, press(KeyCode::Char('q')), 10), Action::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut s, ctrl_c, 10), Action::Quit);
    }

    #[test]
    fn plain_c_collapses_all() {
        let mut s = session();
        handle_key(&mut s, press(KeyCode::Char('e')), 10);
        assert_eq!(s.rows().len(), 4);
        assert_eq!(handle_key(&mut s, press(KeyCode::Char('c')), 10), Action::None);
        assert_eq!(s.rows().len(), 2);
    }

    #[test]
    fn enter_toggles_and_arrows_move() {
        let mut s = session();
        handle_key(&mut s, press(KeyCode::Enter), 10);
        assert_eq!(s.rows().len(), 4);
        handle_key(&mut s, press(KeyCode::Down), 10);
        assert_eq!(s.selected_path().as_deref(), Some("src/lib.rs"));
        handle_key(&mut s, press(KeyCode::Left), 10);
        assert_eq!(s.selected_path().as_deref(), Some("src"));
    }

    #[test]
    fn export_and_reload_are_deferred_to_the_loop() {
        let mut s = session();
        assert_eq!(handle_key(&mut s, press(KeyCode::Char('x')), 10), Action::Export);
        assert_eq!(handle_key(&mut s, press(KeyCode::Char('r')), 10), Action::Reload);
    }
}
