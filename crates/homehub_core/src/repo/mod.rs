//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract over the five record collections.
//! - Isolate SQLite and body encoding from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Record::validate()` before persistence.
//! - `get` reports absence as `Ok(None)`; only engine or decode failures are
//!   errors.

pub mod record_repo;
