//! Application layer - use cases and orchestration.
//!
//! Tag resolution, body extraction, markup flattening and the per-note
//! export loop.

pub mod body_extractor;
pub mod exporter;
pub mod formatter;
pub mod markup;
pub mod tag_index;

pub use exporter::Exporter;
pub use formatter::{format_failures_table, format_stats};
pub use tag_index::TagSource;
