//! Core storage logic for notebooks with user-defined columns.
//! One SQLite file per notebook; column names are stored as codec identifiers.

pub mod codec;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;

pub use codec::{decode, encode, FormatError, MARKER};
pub use config::{notebook_file_path, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::column::{Column, ColumnRegistry};
pub use model::note::{FieldValue, NoteFields, NoteId, NoteRecord, NoteSummary};
pub use render::{escape_html, EscapedTextRenderer, MarkdownRenderer};
pub use repo::notebook_repo::{
    NotebookStore, SchemaError, SqliteNotebookStore, StoreError, StoreResult,
};
pub use service::notebook_service::{NotebookService, NotebookSnapshot};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
