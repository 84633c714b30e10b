//! # Idlink Core
//!
//! Business logic for the identity session: no HTTP, no platform code.
//!
//! This crate contains:
//! - Port interfaces (token broker, secondary login, management API)
//! - Profile metadata service
//! - Identity link coordinator (link/unlink state machine)
//! - Session view model that reconciles state after every mutation
//!
//! ## Architecture Principles
//! - Only depends on `idlink-domain`
//! - All external collaborators reached through traits
//! - Pure, testable orchestration logic

pub mod auth;
pub mod linking;
pub mod management;
pub mod metadata;
pub mod session;

// Re-export specific items to avoid ambiguity
pub use auth::ports::{
    AcquireOptions, SecondaryAuthenticator, SecondaryLogin, SecondaryLoginRequest, TokenBroker,
};
pub use linking::{primary_key, secondary_identities, IdentityLinkCoordinator, LinkState};
pub use management::ports::ManagementApi;
pub use metadata::{MetadataFetch, ProfileMetadataService};
pub use session::{
    IdentitySlice, MetadataSlice, ReportedFailure, SessionOperation, SessionSnapshot,
    SessionViewModel,
};
