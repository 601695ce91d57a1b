//! Fixed notebook tables.
//!
//! `notes` starts with the two reserved fields only; user columns are added
//! at runtime and mirrored in `note_columns`.

use super::DbResult;
use rusqlite::Connection;

/// Reserved note id field.
pub const ID_FIELD: &str = "id";
/// Reserved note body field.
pub const CONTENT_FIELD: &str = "content";
/// Fields of `notes` that are never user columns.
pub const RESERVED_FIELDS: [&str; 2] = [ID_FIELD, CONTENT_FIELD];

const BASE_SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates any missing fixed table. Safe to call on every open.
pub fn ensure_base_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(BASE_SCHEMA_SQL)?;
    Ok(())
}
