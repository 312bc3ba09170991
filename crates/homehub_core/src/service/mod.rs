//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository writes and cache reloads into use-case APIs.
//! - Keep front-ends decoupled from storage details.

pub mod hub_service;
