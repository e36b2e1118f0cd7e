#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use repotree::cli::Args;
use repotree::event_loop;
use repotree::export;
use repotree::render::RenderConfig;
use repotree::session::{load_tree, Session};
use repotree::snapshot::{
    build_ignore_set, read_snapshot, EntryFilter, FileLoader, SnapshotLoader, StaticLoader,
};
use repotree::terminal;
use repotree::watcher;
use std::io::{IsTerminal, Write};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run_app() {
        eprintln!("repotree: {e:#}");
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let args = Args::parse().validated();
    init_logging(&args);

    let filter = EntryFilter {
        ignore: build_ignore_set(&args.ignore),
        max_entries: args.entry_limit(),
    };

    let loader: Box<dyn SnapshotLoader> = if args.reads_stdin() {
        let snapshot = read_snapshot(std::io::stdin().lock(), "<stdin>")
            .context("failed to read snapshot")?;
        Box::new(StaticLoader {
            snapshot,
            origin: "<stdin>".to_string(),
        })
    } else {
        anyhow::ensure!(
            args.snapshot.is_file(),
            "{}: No such file",
            args.snapshot.display()
        );
        Box::new(FileLoader {
            path: args.snapshot.clone(),
        })
    };

    let loaded = load_tree(loader.as_ref(), &filter).context("failed to load snapshot")?;
    if loaded.is_truncated() {
        warn!(
            kept = loaded.kept_entries,
            total = loaded.total_entries,
            "snapshot entries were filtered or capped"
        );
    }
    let repo_name = resolve_repo_name(&args, loaded.repo_name.as_deref());

    if args.export {
        let text = export::serialize(&loaded.tree, &repo_name);
        match &args.output {
            Some(path) => {
                std::fs::write(path, &text)
                    .with_context(|| format!("{}: failed to write export", path.display()))?;
                info!(path = %path.display(), lines = export::node_line_count(&text), "wrote export");
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
                stdout.flush()?;
            }
        }
        return Ok(());
    }

    let render_config = RenderConfig {
        use_color: !args.no_color,
        show_sizes: !args.no_sizes,
    };

    let mut session = Session::new(loaded, repo_name, args.max_depth);
    if args.expand_all {
        session.expand_all();
    }

    // Keep the debouncer alive for the whole session.
    let (_debouncer, watch_rx) = if args.reads_stdin() || args.no_watch {
        (None, None)
    } else {
        let (debouncer, rx) = watcher::start_watcher(&args.snapshot, args.debounce_ms)
            .map_err(anyhow::Error::msg)
            .context("failed to start watcher")?;
        (Some(debouncer), Some(rx))
    };

    if !args.no_title {
        let (term_width, _) = terminal::terminal_size();
        if let Some(title) = build_terminal_title(session.repo_name(), term_width as usize) {
            let mut stdout = std::io::stdout();
            let _ = write!(stdout, "\x1b]0;{}\x07", title);
            let _ = stdout.flush();
        }
    }

    let mut term = terminal::init().context("failed to initialize terminal")?;
    let result = event_loop::run(
        &mut term,
        &mut session,
        loader.as_ref(),
        &filter,
        &render_config,
        watch_rx,
    );
    terminal::restore();

    let outcome = result.context("terminal I/O failed")?;
    if let Some(text) = outcome.export {
        print!("{text}");
    }
    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` overrides the verbosity flags.
///
/// While the interactive outline owns a terminal stderr, logging stays off
/// unless `RUST_LOG` asks for it; the status bar reports reloads instead.
fn init_logging(args: &Args) {
    let interactive_tty = !args.export && std::io::stderr().is_terminal();
    let default_level = if interactive_tty { "off" } else { args.log_level() };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Header name: `--name`, then the snapshot's repository, then the file stem.
fn resolve_repo_name(args: &Args, from_snapshot: Option<&str>) -> String {
    if let Some(name) = &args.name {
        return name.clone();
    }
    if let Some(name) = from_snapshot {
        return name.to_string();
    }
    if !args.reads_stdin() {
        if let Some(stem) = args.snapshot.file_stem() {
            return stem.to_string_lossy().to_string();
        }
    }
    "repo".to_string()
}

/// Build a terminal title of the form "repotree: <name>", truncated with a
/// middle ellipsis so it does not exceed `max_cols` characters.
fn build_terminal_title(repo_name: &str, max_cols: usize) -> Option<String> {
    if max_cols == 0 {
        return None;
    }
    let raw_title = format!("repotree: {}", repo_name);
    let sanitized = sanitize_title(&raw_title);
    Some(truncate_middle(&sanitized, max_cols))
}

/// Remove control characters that might interfere with terminal behavior.
fn sanitize_title(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == ' ')
        .collect()
}

/// Truncate a string in the middle with "..." so its length in characters
/// does not exceed `max_cols`.
fn truncate_middle(input: &str, max_cols: usize) -> String {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() <= max_cols {
        return input.to_string();
    }
    if max_cols <= 3 {
        return ".".repeat(max_cols);
    }

    let keep = max_cols - 3;
    let prefix_len = keep / 2 + keep % 2;
    let suffix_len = keep / 2;

    let prefix: String = chars[..prefix_len].iter().collect();
    let suffix: String = chars[chars.len() - suffix_len..].iter().collect();
    format!("{prefix}...{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_middle_short_strings_unchanged() {
        assert_eq!(truncate_middle("short", 10), "short");
    }

    #[test]
    fn truncate_middle_basic_case() {
        let truncated = truncate_middle("current_path_too_long", 16);
        assert_eq!(truncated, "current...o_long");
        assert_eq!(truncated.chars().count(), 16);
    }

    #[test]
    fn truncate_middle_counts_chars_not_bytes() {
        assert_eq!(truncate_middle("ééééééééé", 7), "éé...éé");
    }

    #[test]
    fn title_strips_controls() {
        let title = build_terminal_title("de\u{7}mo", 80).unwrap();
        assert_eq!(title, "repotree: demo");
    }

    #[test]
    fn repo_name_precedence() {
        let args = Args::try_parse_from(["repotree", "dir/octo.json"]).unwrap();
        assert_eq!(resolve_repo_name(&args, Some("demo")), "demo");
        assert_eq!(resolve_repo_name(&args, None), "octo");

        let named = Args::try_parse_from(["repotree", "-n", "mine", "dir/octo.json"]).unwrap();
        assert_eq!(resolve_repo_name(&named, Some("demo")), "mine");

        let stdin = Args::try_parse_from(["repotree"]).unwrap();
        assert_eq!(resolve_repo_name(&stdin, None), "repo");
    }
}
