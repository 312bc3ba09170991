//! Household domain model.
//!
//! # Responsibility
//! - Define the five persisted record types and their field rules.
//! - Define the collection registry and the snapshot shape.
//!
//! # Invariants
//! - Every record is identified by a store-assigned integer `RecordId`.
//! - Records are never deleted; there is no tombstone either.

pub mod family;
pub mod journal;
pub mod record;
pub mod shopping;
pub mod snapshot;
pub mod task;
