//! Outline rendering using ratatui Line/Span styling.

use crate::outline::Row;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::collections::HashSet;

/// Configuration for the rendering pipeline.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    /// Whether to emit color styling.
    pub use_color: bool,
    /// Whether to append byte sizes to leaf rows.
    pub show_sizes: bool,
}

const DIR_STYLE: Style = Style::new().fg(Color::Blue).add_modifier(Modifier::BOLD);
const SIZE_STYLE: Style = Style::new().fg(Color::DarkGray);
const AFFORDANCE_STYLE: Style = Style::new().fg(Color::White);
const ADDED_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
// Turquoise-green for added directories (distinct from default blue).
const ADDED_DIR_STYLE: Style = Style::new()
    .fg(Color::Rgb(64, 224, 208))
    .add_modifier(Modifier::BOLD);

const EXPANDED: &str = "\u{25be} "; // ▾
const COLLAPSED: &str = "\u{25b8} "; // ▸
const NO_AFFORDANCE: &str = "  ";
const INDENT: &str = "  ";

/// Sanitize control characters to avoid terminal control-sequence injection.
fn sanitize_terminal_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xFF {
                    out.push_str(&format!("\\x{:02X}", code));
                } else {
                    out.push_str(&format!("\\u{{{:X}}}", code));
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Human-readable byte size (1024-based).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Convert visible outline rows into styled ratatui `Line` objects.
///
/// `highlighted` holds node paths to mark as recently added; `selected` is
/// the index of the cursor row, if any.
pub fn rows_to_lines(
    rows: &[Row<'_>],
    config: &RenderConfig,
    highlighted: &HashSet<String>,
    selected: Option<usize>,
) -> Vec<Line<'static>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let line = row_to_line(row, config, highlighted);
            if selected == Some(i) {
                line.patch_style(Style::new().add_modifier(Modifier::REVERSED))
            } else {
                line
            }
        })
        .collect()
}

/// Convert a single outline row into a styled `Line`.
fn row_to_line(row: &Row<'_>, config: &RenderConfig, highlighted: &HashSet<String>) -> Line<'static> {
    let node = row.node;
    let is_dir = node.is_container();
    let is_added = config.use_color && highlighted.contains(&node.path);
    let mut spans = Vec::new();

    let affordance = match (row.expandable(), row.expanded) {
        (true, true) => EXPANDED,
        (true, false) => COLLAPSED,
        (false, _) => NO_AFFORDANCE,
    };
    let lead = format!("{}{}", INDENT.repeat(row.depth), affordance);
    if config.use_color {
        spans.push(Span::styled(lead, AFFORDANCE_STYLE));
    } else {
        spans.push(Span::raw(lead));
    }

    let mut name = sanitize_terminal_text(&node.name);
    if is_dir {
        name.push('/');
    }
    let style = match (config.use_color, is_added, is_dir) {
        (false, _, _) => Style::new(),
        (true, true, true) => ADDED_DIR_STYLE,
        (true, true, false) => ADDED_STYLE,
        (true, false, true) => DIR_STYLE,
        (true, false, false) => Style::new(),
    };
    spans.push(Span::styled(name, style));

    if config.show_sizes && !is_dir {
        if let Some(size) = node.size {
            let text = format!("  {}", format_size(size));
            if config.use_color {
                spans.push(Span::styled(text, SIZE_STYLE));
            } else {
                spans.push(Span::raw(text));
            }
        }
    }

    Line::from(spans)
}

/// Build a line indicating that entries were left out of the tree.
pub fn truncation_line(shown: usize, total: usize) -> Line<'static> {
    let msg = format!("... showing {} of {} entries (truncated)", shown, total);
    let safe_msg = sanitize_terminal_text(&msg);
    let style = Style::new().fg(Color::DarkGray);
    Line::from(Span::styled(safe_msg, style))
}

/// Build a styled status bar `Line`.
pub fn status_bar_line(source: &str, entry_info: &str, message: Option<&str>) -> Line<'static> {
    let message_text = match message {
        Some(m) => sanitize_terminal_text(m),
        None => "No reloads yet".to_string(),
    };

    let safe_source = sanitize_terminal_text(source);
    let safe_entry_info = sanitize_terminal_text(entry_info);
    let text = format!(
        " Snapshot: {}  |  {}  |  {}",
        safe_source, safe_entry_info, message_text
    );

    let style = Style::new()
        .fg(Color::White)
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD);

    Line::from(Span::styled(text, style))
}

/// Build a help bar `Line` showing available keyboard shortcuts.
pub fn help_bar_line() -> Line<'static> {
    let text = " q: Quit  |  \u{2191}\u{2193}/jk: Move  |  Enter/Space: Toggle  |  \u{2190}\u{2192}/hl: Collapse/Expand  |  e/c: Expand/Collapse all  |  r: Reload  |  x: Export";
    let style = Style::new().fg(Color::DarkGray);
    Line::from(Span::styled(text.to_string(), style))
}

/// Extract plain text from a `Line` (useful for testing).
pub fn line_to_plain_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}
