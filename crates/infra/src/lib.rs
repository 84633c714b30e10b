//! # Idlink Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - HTTP transport with retry for idempotent reads
//! - Management API client implementing `ManagementApi`
//! - Configuration loading (environment and JSON/TOML files)
//! - Conversions from transport errors into `IdentityError`
//!
//! ## Architecture
//! - Implements traits defined in `idlink-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod config;
pub mod errors;
pub mod http;
pub mod management;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use management::ManagementApiClient;
