//! SQLite connection bootstrap and base schema for notebook files.
//!
//! # Responsibility
//! - Open and configure one SQLite connection per store call.
//! - Create the fixed tables (`metadata`, `notes`, `note_columns`).
//!
//! # Invariants
//! - Connections are owned by a single call and closed on drop.
//! - The linked SQLite engine supports `ALTER TABLE ... DROP COLUMN`.
//! - Dynamic note columns are never created here; see `repo::notebook_repo`.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
mod schema;

pub use open::open_notebook_db;
pub use schema::{ensure_base_schema, CONTENT_FIELD, ID_FIELD, RESERVED_FIELDS};

pub type DbResult<T> = Result<T, DbError>;

/// Storage-level failure (connection, IO, constraint).
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedEngine {
        version: &'static str,
        minimum: &'static str,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedEngine { version, minimum } => write!(
                f,
                "sqlite {version} can not alter note columns; {minimum} or newer is required"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedEngine { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
