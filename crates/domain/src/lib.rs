//! # Idlink Domain
//!
//! Data types shared by every layer of the identity session core.
//!
//! This crate contains:
//! - Profile, metadata and linked-identity models
//! - Scoped credential wrapper
//! - Domain error type and Result definition
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other Idlink crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
