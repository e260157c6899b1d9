//! Output formatting: notebook folder names, creation dates, progress and
//! run summaries.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeDelta, Utc};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{ExportStats, NoteDocument, NoteFailure};

/// Correction applied to `ZCREATED`, read as Unix seconds.
///
/// The store counts from a later epoch; 31 years and 9 days lands within
/// about a day of the real date.
pub const CREATED_OFFSET_DAYS: i64 = 31 * 365 + 9;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Characters replaced by `_` in notebook folder names.
const UNSAFE_NOTEBOOK_CHARS: [char; 5] = [' ', '.', '/', '\\', '\''];

/// Filesystem-safe folder name for a notebook. Blank names yield an empty string.
#[must_use]
pub fn notebook_dir_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if UNSAFE_NOTEBOOK_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Directory receiving a notebook's notes; blank notebooks map to `root`.
#[must_use]
pub fn notebook_dir(root: &Path, notebook: &str) -> PathBuf {
    let name = notebook_dir_name(notebook);
    if name.is_empty() {
        root.to_path_buf()
    } else {
        root.join(name)
    }
}

/// Converts a raw `ZCREATED` value into a corrected UTC instant.
#[must_use]
pub fn corrected_created(raw: f64) -> Option<DateTime<Utc>> {
    if !raw.is_finite() {
        return None;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (secs, nanos) = {
        let secs = raw.floor();
        // A fraction just below 1.0 can round up to a full second.
        (secs as i64, (((raw - secs) * 1e9) as u32).min(999_999_999))
    };

    DateTime::from_timestamp(secs, nanos)?.checked_add_signed(TimeDelta::days(CREATED_OFFSET_DAYS))
}

/// Formats a creation instant as `YYYY-MM-DD HH:MM:SS`.
#[must_use]
pub fn format_date(dt: DateTime<Utc>, utc: bool) -> String {
    if utc {
        dt.format(DATE_FORMAT).to_string()
    } else {
        dt.with_timezone(&Local).format(DATE_FORMAT).to_string()
    }
}

/// Formats the raw store timestamp, or an empty string when it is missing
/// or out of range.
#[must_use]
pub fn format_created(raw: Option<f64>, utc: bool) -> String {
    raw.and_then(corrected_created)
        .map(|dt| format_date(dt, utc))
        .unwrap_or_default()
}

/// Header lines echoed while a note is processed.
#[must_use]
pub fn format_progress(doc: &NoteDocument) -> String {
    let mut out = format!("{}\n{}", doc.title_line().bold(), doc.date_line());
    if let Some(tags) = doc.tags_line() {
        out.push('\n');
        out.push_str(&tags.cyan().to_string());
    }
    out
}

/// Notice for a note skipped because its body is empty.
#[must_use]
pub fn format_skip(title: &str) -> String {
    format!("\n{} Skipping '{}'\n", "!!".yellow().bold(), title)
}

/// Formats run statistics for display.
#[must_use]
pub fn format_stats(stats: &ExportStats) -> String {
    let mut out = format!(
        "{}\n  Notes: {}\n  Written: {}\n  Skipped (empty): {}\n  Failed: {}",
        "📊 Export summary".bold(),
        stats.notes_seen.to_string().cyan(),
        stats.written.to_string().green(),
        stats.skipped.to_string().yellow(),
        stats.failed.to_string().red()
    );
    if stats.tag_warnings > 0 {
        out.push_str(&format!(
            "\n  Written without tags (unknown tag): {}",
            stats.tag_warnings.to_string().yellow()
        ));
    }
    out
}

/// Formats a table of failed notes.
#[must_use]
pub fn format_failures_table(failures: &[NoteFailure]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Title", "Reason"]);

    for failure in failures {
        table.add_row(vec![
            failure
                .note_id
                .map_or_else(|| "?".to_string(), |id| id.to_string()),
            truncate(&failure.title, 35),
            failure.reason.clone(),
        ]);
    }

    table.to_string()
}

/// Truncates a string to max characters with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
