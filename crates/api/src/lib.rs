//! # Idlink App
//!
//! Application layer for the identity profile panel.
//!
//! This crate contains:
//! - Session commands (presentation → core bridge)
//! - Session context (dependency injection, per-session teardown)
//! - Command logging and tracing initialisation
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - The token broker and secondary authenticator are supplied by the host

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
pub use utils::command_helpers::CommandOutcome;
