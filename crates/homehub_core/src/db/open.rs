//! Connection bootstrap for the household database.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Apply pending migrations before handing the connection out.
//!
//! # Invariants
//! - Returned connections have every collection table present.
//! - Re-opening an up-to-date database performs no schema work.

use super::migrations::apply_migrations;
use super::{DbResult, InitializationError, DB_NAME};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating on first run) the database file at `path`.
///
/// # Side effects
/// - Creates the file when missing and applies pending migrations.
/// - Emits `db_open` logging events with duration and status.
///
/// # Errors
/// - `InitializationError::Open` when the engine cannot open the file.
/// - `InitializationError::Bootstrap` when pragmas or migrations fail.
pub fn initialize(path: impl AsRef<Path>) -> Result<Connection, InitializationError> {
    open_with("file", || Connection::open(path))
}

/// Opens a private in-memory database with the full schema applied.
pub fn initialize_in_memory() -> Result<Connection, InitializationError> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with<F>(mode: &'static str, open: F) -> Result<Connection, InitializationError>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode} db={DB_NAME}");

    let mut conn = open().map_err(|err| {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={err}",
            started_at.elapsed().as_millis()
        );
        InitializationError::Open(err.into())
    })?;

    bootstrap_connection(&mut conn).map_err(|err| {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={err}",
            started_at.elapsed().as_millis()
        );
        InitializationError::Bootstrap(err)
    })?;

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
