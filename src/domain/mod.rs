//! Domain layer - core types.
//!
//! This layer contains pure domain models, configuration and error types
//! without any external dependencies (DB, IO, etc.).

pub mod config;
pub mod error;
pub mod models;

pub use config::{AppConfig, ExportConfig};
pub use error::{AppError, Result};
pub use models::{ExportStats, MarkupNode, Note, NoteDocument, NoteFailure, NoteOutcome};
