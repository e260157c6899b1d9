//! Domain models for exported Evernote data.
//!
//! These models represent the entities read from Evernote's `SQLite` store
//! and the documents derived from them.

use std::path::PathBuf;

/// A note row as enumerated by the metadata store.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Primary key assigned by Evernote.
    pub id: i64,
    /// Note title, possibly missing.
    pub title: Option<String>,
    /// Raw creation timestamp in the store's own encoding.
    pub created: Option<f64>,
    /// Notebook name; empty or missing means the output root.
    pub notebook: Option<String>,
}

impl Note {
    /// Title, or an empty string when the store has none.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Notebook name, or an empty string when the store has none.
    #[must_use]
    pub fn notebook(&self) -> &str {
        self.notebook.as_deref().unwrap_or_default()
    }
}

/// A node of a parsed note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    /// Literal character data.
    Text(String),
    /// An element's children in document order.
    Element { children: Vec<MarkupNode> },
}

impl MarkupNode {
    /// Shorthand for a text leaf.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Shorthand for an element node.
    #[must_use]
    pub const fn element(children: Vec<Self>) -> Self {
        Self::Element { children }
    }
}

/// A text document ready to be written for a single note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDocument {
    pub title: String,
    /// Formatted creation date (`YYYY-MM-DD HH:MM:SS`).
    pub date: String,
    /// Tag names; `None` when the note has no tags.
    pub tags: Option<Vec<String>>,
    /// Flattened body text.
    pub body: String,
}

impl NoteDocument {
    #[must_use]
    pub fn title_line(&self) -> String {
        format!("@Title: {}", self.title)
    }

    #[must_use]
    pub fn date_line(&self) -> String {
        format!("@Date: {}", self.date)
    }

    /// The tags line, present only when at least one tag exists.
    #[must_use]
    pub fn tags_line(&self) -> Option<String> {
        self.tags
            .as_ref()
            .filter(|tags| !tags.is_empty())
            .map(|tags| format!("@Tags: {}", tags.join(", ")))
    }

    /// Renders header lines and body joined by newlines.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec![self.title_line(), self.date_line()];
        lines.extend(self.tags_line());
        lines.push(self.body.clone());
        lines.join("\n")
    }
}

/// What happened to a single note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteOutcome {
    /// Document written to the given path.
    Written(PathBuf),
    /// Body was empty; nothing written.
    Skipped,
}

/// A note that could not be exported.
#[derive(Debug, Clone)]
pub struct NoteFailure {
    /// `None` when the row's primary key itself was unreadable.
    pub note_id: Option<i64>,
    pub title: String,
    pub reason: String,
}

/// Summary statistics for an export run.
#[derive(Debug, Clone, Default)]
pub struct ExportStats {
    /// Notes enumerated from the store.
    pub notes_seen: usize,
    /// Files written.
    pub written: usize,
    /// Notes skipped because their body was empty.
    pub skipped: usize,
    /// Notes that failed with a per-note error.
    pub failed: usize,
    /// Notes written without a tags line because a tag could not be resolved.
    pub tag_warnings: usize,
    pub failures: Vec<NoteFailure>,
}

impl ExportStats {
    /// Records the outcome of one note.
    pub fn record(&mut self, outcome: &NoteOutcome) {
        self.notes_seen += 1;
        match outcome {
            NoteOutcome::Written(_) => self.written += 1,
            NoteOutcome::Skipped => self.skipped += 1,
        }
    }

    /// Records a per-note failure.
    pub fn record_failure(&mut self, note: &Note, reason: impl Into<String>) {
        self.record_row_failure(Some(note.id), note.title(), reason);
    }

    /// Records a failure for a row that never decoded into a `Note`.
    pub fn record_row_failure(
        &mut self,
        note_id: Option<i64>,
        title: &str,
        reason: impl Into<String>,
    ) {
        self.notes_seen += 1;
        self.failed += 1;
        self.failures.push(NoteFailure {
            note_id,
            title: title.to_string(),
            reason: reason.into(),
        });
    }
}
