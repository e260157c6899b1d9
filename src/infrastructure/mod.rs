//! Infrastructure layer - external adapters (database, filesystem).
//!
//! This layer handles all I/O against Evernote's local data.

pub mod config;
pub mod evernote_paths;
pub mod sqlite_reader;

pub use config::load_config;
pub use evernote_paths::resolve_data_dir;
pub use sqlite_reader::NoteStore;
