//! Note export service.
//!
//! Walks the notes of the metadata store and writes one text document per
//! note into its notebook folder.

use std::fs;

use crate::domain::{
    AppError, ExportConfig, ExportStats, Note, NoteDocument, NoteOutcome, Result,
};
use crate::infrastructure::NoteStore;

use super::body_extractor::extract;
use super::formatter::{format_created, format_progress, format_skip, notebook_dir};
use super::markup::flatten;
use super::tag_index::TagIndex;

/// Export context for one run. Owns the store connection and the tag cache.
pub struct Exporter {
    config: ExportConfig,
    store: NoteStore,
    tags: TagIndex,
    stats: ExportStats,
}

impl Exporter {
    /// Opens the metadata store named by the configuration.
    ///
    /// # Errors
    /// Returns error if the store cannot be opened.
    pub fn open(config: ExportConfig) -> Result<Self> {
        let store = NoteStore::open(&config.db_path())?;
        Ok(Self::new(config, store))
    }

    #[must_use]
    pub fn new(config: ExportConfig, store: NoteStore) -> Self {
        Self {
            config,
            store,
            tags: TagIndex::new(),
            stats: ExportStats::default(),
        }
    }

    /// Exports every note, reporting and skipping per-note failures.
    ///
    /// # Errors
    /// Returns error only for store-level faults.
    pub fn run(mut self) -> Result<ExportStats> {
        let notes = self.store.fetch_notes()?;
        tracing::info!("Exporting {} notes to {}", notes.len(), self.config.output_dir.display());

        for row in notes {
            let note = match row {
                Ok(note) => note,
                Err(AppError::InvalidRow { id, message }) => {
                    tracing::warn!(note_id = ?id, "Skipping unreadable note row: {}", message);
                    self.stats
                        .record_row_failure(id, "", format!("Unreadable note row: {message}"));
                    continue;
                }
                Err(e) => return Err(e),
            };

            match self.export_note(&note) {
                Ok(outcome) => {
                    if let NoteOutcome::Written(path) = &outcome {
                        tracing::debug!(note_id = note.id, path = %path.display(), "Note written");
                    }
                    self.stats.record(&outcome);
                }
                Err(e) if e.is_per_note() => {
                    tracing::warn!(note_id = note.id, "Failed to export '{}': {}", note.title(), e);
                    self.stats.record_failure(&note, e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            written = self.stats.written,
            skipped = self.stats.skipped,
            failed = self.stats.failed,
            "Export finished"
        );

        Ok(self.stats)
    }

    /// Exports a single note.
    ///
    /// # Errors
    /// Returns a per-note error for unreadable or malformed content and
    /// unwritable output, or a store error if the tag index cannot load.
    pub fn export_note(&mut self, note: &Note) -> Result<NoteOutcome> {
        let notebook_dir = notebook_dir(&self.config.output_dir, note.notebook());
        fs::create_dir_all(&notebook_dir).map_err(|e| {
            AppError::io(format!("Failed to create {}", notebook_dir.display()), e)
        })?;

        let mut doc = NoteDocument {
            title: note.title().to_string(),
            date: format_created(note.created, self.config.utc),
            tags: self.resolve_tags(note)?,
            body: String::new(),
        };

        if !self.config.quiet {
            println!("{}", format_progress(&doc));
        }

        let content_path = self.config.content_path(note.id);
        let raw = fs::read(&content_path).map_err(|e| {
            AppError::io(format!("Failed to read {}", content_path.display()), e)
        })?;

        let inner = String::from_utf8_lossy(extract(&raw)?);
        let inner = inner.trim();
        if !inner.is_empty() {
            doc.body = flatten(inner);
        }

        if doc.body.trim().is_empty() {
            if !self.config.quiet {
                println!("{}", format_skip(note.title()));
            }
            tracing::info!(note_id = note.id, "Skipping note with empty body");
            return Ok(NoteOutcome::Skipped);
        }

        let path = notebook_dir.join(format!("{}.txt", note.id));
        fs::write(&path, doc.render())
            .map_err(|e| AppError::io(format!("Failed to write {}", path.display()), e))?;

        Ok(NoteOutcome::Written(path))
    }

    /// Resolves tag names. An unknown tag drops the tags line for this note
    /// instead of failing it.
    fn resolve_tags(&mut self, note: &Note) -> Result<Option<Vec<String>>> {
        match self.tags.tags_for(&self.store, note.id) {
            Err(e @ AppError::UnknownTag { .. }) => {
                tracing::warn!("{}; writing '{}' without tags", e, note.title());
                self.stats.tag_warnings += 1;
                Ok(None)
            }
            other => other,
        }
    }
}
