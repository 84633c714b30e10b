//! Conversions from external infrastructure errors into domain errors.

use idlink_domain::IdentityError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub IdentityError);

impl From<InfraError> for IdentityError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<IdentityError> for InfraError {
    fn from(value: IdentityError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoIdentityError {
    fn into_identity(self) -> IdentityError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → IdentityError */
/* -------------------------------------------------------------------------- */

impl IntoIdentityError for HttpError {
    fn into_identity(self) -> IdentityError {
        if self.is_timeout() {
            return IdentityError::TransportFailure("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return IdentityError::TransportFailure("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            return IdentityError::ProviderRejected {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown status").to_string(),
            };
        }

        if self.is_decode() {
            return IdentityError::TransportFailure(format!("invalid response body: {self}"));
        }

        if self.is_builder() {
            return IdentityError::Internal(format!("invalid HTTP request: {self}"));
        }

        IdentityError::TransportFailure(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_identity())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → IdentityError */
/* -------------------------------------------------------------------------- */

impl IntoIdentityError for JsonError {
    fn into_identity(self) -> IdentityError {
        if self.is_io() {
            return IdentityError::TransportFailure(format!("failed to read response: {self}"));
        }
        IdentityError::TransportFailure(format!("malformed provider response: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_identity())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
