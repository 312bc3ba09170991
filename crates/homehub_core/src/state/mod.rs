//! In-memory application state and the read models built from it.
//!
//! # Responsibility
//! - Own the snapshot front-ends render from.
//! - Keep reload and optimistic updates the only ways it changes.

pub mod app_state;
pub mod projection;
