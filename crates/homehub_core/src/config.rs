//! Runtime configuration for embedding the household core.
//!
//! Front-ends build a [`HubConfig`] (from flags, env or defaults) and use it
//! to open storage and start logging.

use crate::db::{self, InitializationError, DEFAULT_DB_FILE_NAME};
use crate::logging::{default_log_level, init_logging, LoggingError};
use rusqlite::Connection;
use std::path::PathBuf;

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    /// Private, discarded when the connection closes.
    InMemory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    pub db: DbLocation,
    pub log_level: String,
    /// File logging is off when `None`.
    pub log_dir: Option<PathBuf>,
    /// Insert default data when every collection is empty.
    pub seed_on_first_run: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            db: DbLocation::File(PathBuf::from(DEFAULT_DB_FILE_NAME)),
            log_level: default_log_level().to_string(),
            log_dir: None,
            seed_on_first_run: true,
        }
    }
}

impl HubConfig {
    /// Opens (and on first run creates) the configured database.
    pub fn open_db(&self) -> Result<Connection, InitializationError> {
        match &self.db {
            DbLocation::File(path) => db::initialize(path),
            DbLocation::InMemory => db::initialize_in_memory(),
        }
    }

    /// Starts file logging when a directory is configured.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        match &self.log_dir {
            Some(dir) => init_logging(&self.log_level, dir),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DbLocation, HubConfig};
    use crate::db::migrations::{current_user_version, latest_version};

    #[test]
    fn default_config_targets_file_database_with_seeding() {
        let config = HubConfig::default();
        assert!(matches!(config.db, DbLocation::File(ref path) if path.ends_with("homehub.sqlite3")));
        assert!(config.seed_on_first_run);
        assert!(config.log_dir.is_none());
        config.init_logging().unwrap();
    }

    #[test]
    fn in_memory_config_opens_migrated_database() {
        let config = HubConfig {
            db: DbLocation::InMemory,
            ..HubConfig::default()
        };
        let conn = config.open_db().unwrap();
        assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    }
}
