//! Configuration management
//!
//! One structure describes the identity provider, the management API scopes
//! each operation requests, and HTTP tuning. It is built once (see
//! `idlink_infra::config`) and injected into the token broker adapter and
//! both services at construction.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HTTP_BACKOFF_MS, DEFAULT_HTTP_MAX_ATTEMPTS, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_METADATA_FORM_KEY, MANAGEMENT_API_PATH, SCOPE_READ_CURRENT_USER,
    SCOPE_UPDATE_CURRENT_USER_IDENTITIES, SCOPE_UPDATE_CURRENT_USER_METADATA, SCOPE_UPDATE_USERS,
};
use crate::errors::{IdentityError, Result};
use crate::impl_wire_name_conversions;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Identity provider tenant and scopes.
    pub provider: ProviderConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Reject configurations that cannot reach a provider.
    pub fn validate(&self) -> Result<()> {
        if self.provider.domain.trim().is_empty() {
            return Err(IdentityError::Config("provider domain must not be empty".into()));
        }
        if self.provider.client_id.trim().is_empty() {
            return Err(IdentityError::Config("provider client_id must not be empty".into()));
        }
        for scope in ManagementScope::ALL {
            if self.provider.scopes.get(scope).trim().is_empty() {
                return Err(IdentityError::Config(format!("scope for {scope} must not be empty")));
            }
        }
        if self.http.max_attempts == 0 {
            return Err(IdentityError::Config("http.max_attempts must be at least 1".into()));
        }
        if self.session.metadata_form_key.trim().is_empty() {
            return Err(IdentityError::Config("session.metadata_form_key must not be empty".into()));
        }
        Ok(())
    }
}

/// Identity provider settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Tenant domain, e.g. `dev-abc123.us.auth0.com`
    pub domain: String,
    /// Client id of the application.
    pub client_id: String,
    /// Audience for management API credentials. Defaults to
    /// `https://{domain}/api/v2/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    /// Overrides `https://{domain}/api/v2` (proxies, tests).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_base_url: Option<String>,
    #[serde(default)]
    pub scopes: ScopeConfig,
}

impl ProviderConfig {
    /// Provider with default audience, base URL and scopes.
    pub fn new(domain: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self { domain: domain.into(), client_id: client_id.into(), ..Self::default() }
    }

    /// Audience requested for every scoped credential.
    pub fn audience(&self) -> String {
        self.audience
            .clone()
            .unwrap_or_else(|| format!("https://{}{}/", self.domain, MANAGEMENT_API_PATH))
    }

    /// Base URL of the management API without a trailing slash.
    pub fn management_base_url(&self) -> String {
        match &self.management_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}{}", self.domain, MANAGEMENT_API_PATH),
        }
    }
}

/// The management API permissions this core requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagementScope {
    /// Read the signed-in user's record.
    Read,
    /// Write `user_metadata`.
    UpdateMetadata,
    /// Link a secondary identity.
    UpdateIdentities,
    /// Unlink a secondary identity.
    ManageUsers,
}

impl ManagementScope {
    /// Every scope, in declaration order.
    pub const ALL: [Self; 4] =
        [Self::Read, Self::UpdateMetadata, Self::UpdateIdentities, Self::ManageUsers];
}

impl_wire_name_conversions!(ManagementScope {
    Read => "read",
    UpdateMetadata => "update_metadata",
    UpdateIdentities => "update_identities",
    ManageUsers => "manage_users",
});

/// Scope strings requested for each [`ManagementScope`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Scope for reading the user record.
    pub read: String,
    /// Scope for replacing `user_metadata`.
    pub update_metadata: String,
    /// Scope for linking an identity.
    pub update_identities: String,
    /// Scope for unlinking an identity.
    pub manage_users: String,
}

impl ScopeConfig {
    /// Scope string configured for `scope`.
    pub fn get(&self, scope: ManagementScope) -> &str {
        match scope {
            ManagementScope::Read => &self.read,
            ManagementScope::UpdateMetadata => &self.update_metadata,
            ManagementScope::UpdateIdentities => &self.update_identities,
            ManagementScope::ManageUsers => &self.manage_users,
        }
    }
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            read: SCOPE_READ_CURRENT_USER.to_string(),
            update_metadata: SCOPE_UPDATE_CURRENT_USER_METADATA.to_string(),
            update_identities: SCOPE_UPDATE_CURRENT_USER_IDENTITIES.to_string(),
            manage_users: SCOPE_UPDATE_USERS.to_string(),
        }
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout.
    pub timeout_seconds: u64,
    /// Total attempts for idempotent reads. Writes are always sent once.
    pub max_attempts: usize,
    /// Base retry delay; doubles per retry.
    pub backoff_ms: u64,
    /// Route requests through the proxies named by `HTTP_PROXY`/`HTTPS_PROXY`.
    pub use_system_proxy: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS,
            max_attempts: DEFAULT_HTTP_MAX_ATTEMPTS,
            backoff_ms: DEFAULT_HTTP_BACKOFF_MS,
            use_system_proxy: true,
        }
    }
}

/// Session view model configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Key under which `submit_metadata` stores the submitted text.
    pub metadata_form_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { metadata_form_key: DEFAULT_METADATA_FORM_KEY.to_string() }
    }
}
