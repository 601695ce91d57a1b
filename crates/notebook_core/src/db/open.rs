//! Per-call connection bootstrap.
//!
//! # Invariants
//! - Returned connections carry the configured busy timeout.
//! - Opening never creates tables; callers decide when to bootstrap.

use super::{DbError, DbResult};
use crate::config::StoreConfig;
use log::{debug, error};
use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;

// `DROP COLUMN` landed in 3.35.0.
const MIN_SQLITE_VERSION_NUMBER: i32 = 3_035_000;
const MIN_SQLITE_VERSION: &str = "3.35.0";

/// Opens (creating if needed) the notebook file at `path`.
///
/// # Side effects
/// - Emits `db_connect` debug events with duration; failures log at error.
pub fn open_notebook_db(path: impl AsRef<Path>, config: &StoreConfig) -> DbResult<Connection> {
    let started_at = Instant::now();

    if rusqlite::version_number() < MIN_SQLITE_VERSION_NUMBER {
        error!(
            "event=db_connect module=db status=error error_code=unsupported_engine version={}",
            rusqlite::version()
        );
        return Err(DbError::UnsupportedEngine {
            version: rusqlite::version(),
            minimum: MIN_SQLITE_VERSION,
        });
    }

    let conn = Connection::open(path.as_ref())
        .and_then(|conn| {
            conn.busy_timeout(config.busy_timeout)?;
            Ok(conn)
        })
        .map_err(|err| {
            error!(
                "event=db_connect module=db status=error duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            DbError::from(err)
        })?;

    debug!(
        "event=db_connect module=db status=ok duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}
