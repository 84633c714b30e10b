//! Error types used throughout the identity session core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Idlink
///
/// The first four variants are the failure kinds an operation can report to
/// the session view model. The remaining variants cover configuration and
/// programming errors raised before any provider call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum IdentityError {
    /// Credential acquisition failed because the session is absent or expired.
    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    /// Network or HTTP-level failure talking to the provider.
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// Provider answered with a non-2xx status.
    #[error("Provider rejected request ({status}): {reason}")]
    ProviderRejected { status: u16, reason: String },

    /// The interactive secondary login was aborted.
    #[error("Cancelled by user")]
    UserCancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IdentityError {
    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AuthenticationRequired(_) => "authentication_required",
            Self::TransportFailure(_) => "transport_failure",
            Self::ProviderRejected { .. } => "provider_rejected",
            Self::UserCancelled => "user_cancelled",
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the error came from the interactive login being aborted.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::UserCancelled)
    }
}

/// Result type alias for Idlink operations
pub type Result<T> = std::result::Result<T, IdentityError>;
