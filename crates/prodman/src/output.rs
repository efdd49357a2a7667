//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.
//! Notices from the controllers go to stderr so stdout stays parseable.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use prodman_core::{Notice, NoticeLevel};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled for `stream`.
pub fn should_color(mode: &ColorMode, stream: &impl IsTerminal) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => stream.is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single item. Table mode uses `detail_fn` for a hand-laid-out
/// detail view.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Notices ──────────────────────────────────────────────────────────

/// Print one notice to stderr. Quiet mode keeps only errors.
pub fn print_notice(notice: &Notice, color: &ColorMode, quiet: bool) {
    if quiet && notice.level != NoticeLevel::Error {
        return;
    }
    let line = format_notice(notice, should_color(color, &io::stderr()));
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{line}");
}

fn format_notice(notice: &Notice, color: bool) -> String {
    let (marker, message) = (notice_marker(notice.level), notice.message.as_str());
    if !color {
        return format!("{marker} {message}");
    }
    match notice.level {
        NoticeLevel::Info => format!("{} {message}", marker.cyan()),
        NoticeLevel::Success => format!("{} {message}", marker.green()),
        NoticeLevel::Warning => format!("{} {message}", marker.yellow()),
        NoticeLevel::Error => format!("{} {message}", marker.red().bold()),
    }
}

fn notice_marker(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "i",
        NoticeLevel::Success => "✓",
        NoticeLevel::Warning => "!",
        NoticeLevel::Error => "✗",
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}

pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

/// Cut `text` to `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_notice_has_level_marker() {
        let notice = Notice {
            level: NoticeLevel::Success,
            message: "Product created successfully!".into(),
        };
        assert_eq!(
            format_notice(&notice, false),
            "✓ Product created successfully!"
        );
    }

    #[test]
    fn truncate_keeps_short_text_and_marks_cuts() {
        assert_eq!(truncate("Laptop", 10), "Laptop");
        assert_eq!(truncate("High performance laptop", 8), "High pe…");
    }

    #[test]
    fn plain_list_emits_one_id_per_line() {
        #[derive(serde::Serialize)]
        struct Item {
            id: u32,
        }
        #[derive(Tabled)]
        struct Row {
            id: u32,
        }
        let out = render_list(
            &OutputFormat::Plain,
            &[Item { id: 1 }, Item { id: 2 }],
            |i| Row { id: i.id },
            |i| i.id.to_string(),
        );
        assert_eq!(out, "1\n2");
    }
}
