//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open (creating on first run) the household database.
//! - Ensure every record collection exists before any read or write.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Migrations are additive: a version bump only creates what is missing.
//! - Core code must not touch collections before initialization succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{initialize, initialize_in_memory};
pub use rusqlite::Connection;

/// Logical database name, mirrored into log events.
pub const DB_NAME: &str = "HomeHubDB";

/// File name used when callers do not configure a database path.
pub const DEFAULT_DB_FILE_NAME: &str = "homehub.sqlite3";

pub type DbResult<T> = Result<T, DbError>;

/// Low-level storage failure.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Connection was not opened through [`initialize`].
    Uninitialized {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Uninitialized {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection is at schema version {actual_version}, expected {expected_version}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::Uninitialized { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Fatal failure to open or create the household database.
///
/// The application cannot proceed after this error; front-ends replace
/// their whole surface with the message.
#[derive(Debug)]
pub enum InitializationError {
    /// The engine refused to open the file (permissions, bad path, ...).
    Open(DbError),
    /// The file opened but schema bootstrap failed.
    Bootstrap(DbError),
}

impl Display for InitializationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(err) => write!(f, "failed to open {DB_NAME}: {err}"),
            Self::Bootstrap(err) => write!(f, "failed to prepare {DB_NAME} schema: {err}"),
        }
    }
}

impl Error for InitializationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open(err) | Self::Bootstrap(err) => Some(err),
        }
    }
}
