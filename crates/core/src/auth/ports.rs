//! Port interfaces for credential acquisition and secondary login
//!
//! Both collaborators live outside this workspace: the token broker is the
//! identity provider SDK's silent-token facility, the secondary
//! authenticator is its popup/redirect login ceremony.

use async_trait::async_trait;
use idlink_domain::constants::{SECONDARY_LOGIN_MAX_AGE_SECS, SECONDARY_LOGIN_SCOPE};
use idlink_domain::{ProviderConfig, RawIdToken, Result, ScopedCredential};

/// Options for [`TokenBroker::acquire`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcquireOptions {
    /// Bypass any cached credential and request a fresh one.
    pub force_refresh: bool,
}

impl AcquireOptions {
    /// Accept whatever the broker has cached.
    pub const CACHED: Self = Self { force_refresh: false };

    /// Require a freshly issued credential.
    pub const FORCE_REFRESH: Self = Self { force_refresh: true };
}

/// Trait for obtaining scoped bearer credentials
///
/// Implementations must allow concurrent calls with different scopes; each
/// call is independent.
#[async_trait]
pub trait TokenBroker: Send + Sync {
    /// Acquire a credential for `scope` against `audience`.
    ///
    /// # Errors
    /// `IdentityError::AuthenticationRequired` when the underlying session is
    /// absent or expired. Callers surface this and never retry it.
    async fn acquire(
        &self,
        scope: &str,
        audience: &str,
        options: AcquireOptions,
    ) -> Result<ScopedCredential>;
}

/// Parameters of the interactive login used to prove the method to link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryLoginRequest {
    /// Tenant domain the ceremony runs against.
    pub domain: String,
    /// Client the ceremony is started for.
    pub client_id: String,
    /// Requested scope; only an ID token is needed.
    pub scope: String,
    /// Maximum session age in seconds. `0` forces a fresh login instead of
    /// reusing the primary session.
    pub max_age: u64,
}

impl SecondaryLoginRequest {
    /// Request for the tenant and client described by `provider`.
    pub fn for_provider(provider: &ProviderConfig) -> Self {
        Self {
            domain: provider.domain.clone(),
            client_id: provider.client_id.clone(),
            scope: SECONDARY_LOGIN_SCOPE.to_string(),
            max_age: SECONDARY_LOGIN_MAX_AGE_SECS,
        }
    }
}

/// Outcome of a secondary login ceremony
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecondaryLogin {
    /// The user signed in with the method to link.
    Completed(RawIdToken),
    /// The user closed or aborted the ceremony.
    Cancelled,
}

/// Trait for running an independent login ceremony for the method to link
///
/// The ceremony must not reuse the primary session.
#[async_trait]
pub trait SecondaryAuthenticator: Send + Sync {
    /// Run the ceremony described by `request` and report how it ended.
    async fn authenticate(&self, request: &SecondaryLoginRequest) -> Result<SecondaryLogin>;
}
