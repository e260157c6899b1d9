//! Domain-level error types for evernote-export.
//!
//! All errors are typed with `thiserror`. Per-note variants (`Format`,
//! `InvalidRow`, `UnknownTag`, `Io`) are reported and skipped by the exporter loop; store
//! variants abort the run.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database file not found at expected location.
    #[error("Evernote database not found at: {path}")]
    DatabaseNotFound { path: PathBuf },

    /// Failed to open or query the database.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Note content does not have the expected `<en-note>` envelope.
    #[error("Malformed note content: {message}")]
    Format { message: String },

    /// A note row whose columns cannot be decoded.
    #[error("Unreadable note row: {message}")]
    InvalidRow { id: Option<i64>, message: String },

    /// A note references a tag id with no row in the tag table.
    #[error("Note {note_id} references unknown tag {tag_id}")]
    UnknownTag { note_id: i64, tag_id: i64 },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create a database error from rusqlite error.
    pub fn database(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Create a content format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Whether this error only concerns a single note.
    #[must_use]
    pub const fn is_per_note(&self) -> bool {
        matches!(
            self,
            Self::Format { .. }
                | Self::InvalidRow { .. }
                | Self::UnknownTag { .. }
                | Self::Io { .. }
        )
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
