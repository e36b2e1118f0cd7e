use clap::Parser;
use std::path::PathBuf;

use crate::snapshot::DEFAULT_MAX_ENTRIES;

const AFTER_HELP: &str = "\
Examples:
  repotree snapshot.json              Browse a snapshot interactively
  repotree -x snapshot.json           Print the full tree as plain text
  curl -s https://api.github.com/repos/OWNER/REPO/git/trees/HEAD?recursive=1 \\
    | repotree -x -n REPO -            Export a GitHub tree listing from stdin
  repotree -I 'node_modules' -L 3 snapshot.json";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "repotree",
    version,
    about = "Browse and export the directory tree of a repository snapshot",
    after_help = AFTER_HELP
)]
pub struct Args {
    /// Snapshot JSON file, or '-' to read from stdin
    #[arg(default_value = "-")]
    pub snapshot: PathBuf,

    /// Repository name for the export header (default: from the snapshot or file name)
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,

    /// Print the fully expanded tree as plain text and exit
    #[arg(short = 'x', long = "export")]
    pub export: bool,

    /// Write the export to a file instead of stdout
    #[arg(short = 'o', long = "output", requires = "export")]
    pub output: Option<PathBuf>,

    /// Max display depth of the interactive outline
    #[arg(short = 'L', long = "level")]
    pub max_depth: Option<usize>,

    /// Glob patterns for entries to exclude (repeatable)
    #[arg(short = 'I', long = "ignore", action = clap::ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Maximum number of entries to load (0 for unlimited)
    #[arg(long = "max-entries", default_value_t = DEFAULT_MAX_ENTRIES)]
    pub max_entries: usize,

    /// Start with every directory expanded
    #[arg(long = "expand-all")]
    pub expand_all: bool,

    /// Hide file sizes in the outline
    #[arg(long = "no-sizes")]
    pub no_sizes: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Do not reload when the snapshot file changes
    #[arg(long = "no-watch")]
    pub no_watch: bool,

    /// Do not set the terminal window title
    #[arg(long = "no-title")]
    pub no_title: bool,

    /// Debounce interval for reloads in milliseconds (minimum 50)
    #[arg(long = "debounce", default_value = "200")]
    pub debounce_ms: u64,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Args {
    /// Enforce invariants after parsing.
    pub fn validated(mut self) -> Self {
        if self.debounce_ms < 50 {
            self.debounce_ms = 50;
        }
        if self.max_depth == Some(0) {
            self.max_depth = Some(1);
        }
        // Respect NO_COLOR env var
        if std::env::var_os("NO_COLOR").is_some() {
            self.no_color = true;
        }
        if self.quiet {
            self.verbose = 0;
        }
        self
    }

    pub fn reads_stdin(&self) -> bool {
        self.snapshot.as_os_str() == "-"
    }

    /// Entry cap, with 0 meaning unlimited.
    pub fn entry_limit(&self) -> Option<usize> {
        (self.max_entries > 0).then_some(self.max_entries)
    }

    /// Default log filter directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
