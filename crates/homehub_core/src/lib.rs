//! Core data layer for HomeHub, a household organizer.
//! This crate owns persistence, the application state cache and the
//! invariants around record identity; front-ends only render and dispatch.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod state;
pub mod view;

pub use config::{DbLocation, HubConfig};
pub use db::{initialize, initialize_in_memory, DbError, InitializationError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::family::FamilyMember;
pub use model::journal::JournalEntry;
pub use model::record::{Collection, Record, RecordId, RecordValidationError, UnknownCollection};
pub use model::shopping::{ShoppingItem, Store};
pub use model::snapshot::{Snapshot, SnapshotSlot};
pub use model::task::{Task, TaskType};
pub use repo::record_repo::{
    ReadError, ReadResult, RecordRepository, SqliteRecordRepository, WriteError, WriteResult,
};
pub use service::hub_service::{
    HubService, JournalDraft, ServiceError, ServiceResult, TaskDraft, DEFAULT_STORES,
};
pub use state::app_state::{AppState, ReloadError};
pub use view::{Modal, Navigation, RouteError, View};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
