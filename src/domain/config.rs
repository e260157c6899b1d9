//! Configuration models.
//!
//! `AppConfig` mirrors the optional TOML file; `ExportConfig` is the fully
//! resolved configuration handed to the exporter.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Name of the metadata database inside an account directory.
pub const DATABASE_FILE: &str = "Evernote.sql";

/// Directory holding per-note content folders inside an account directory.
pub const CONTENT_DIR: &str = "content";

/// Name of the ENML file inside a note's content folder.
pub const CONTENT_FILE: &str = "content.enml";

/// Settings read from `config.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Account data directory (the one containing `Evernote.sql`).
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Account id under Evernote's `data/` directory.
    #[serde(default)]
    pub account: Option<String>,

    /// Render dates in UTC instead of local time.
    #[serde(default)]
    pub utc: bool,
}

impl AppConfig {
    /// Default location of the configuration file.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("evernote-export").join("config.toml"))
    }
}

/// Resolved settings for one export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Existing directory receiving notebook folders.
    pub output_dir: PathBuf,
    /// Evernote account directory.
    pub data_dir: PathBuf,
    pub utc: bool,
    /// Suppress per-note progress output.
    pub quiet: bool,
}

impl ExportConfig {
    /// Path of the metadata database.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    /// Path of a note's ENML content file.
    #[must_use]
    pub fn content_path(&self, note_id: i64) -> PathBuf {
        content_path(&self.data_dir, note_id)
    }
}

/// `<data_dir>/content/p<note_id>/content.enml`
#[must_use]
pub fn content_path(data_dir: &Path, note_id: i64) -> PathBuf {
    data_dir
        .join(CONTENT_DIR)
        .join(format!("p{note_id}"))
        .join(CONTENT_FILE)
}
