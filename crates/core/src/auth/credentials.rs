//! Scoped credentials for management API calls

use std::sync::Arc;

use idlink_domain::{
    IdentityError, ManagementScope, ProviderConfig, Result, ScopeConfig, ScopedCredential,
};
use tracing::warn;

use super::ports::{AcquireOptions, TokenBroker};

/// Resolves a [`ManagementScope`] to its configured scope string and asks
/// the broker for a credential against the management API audience.
///
/// A credential that does not grant the requested scope and audience is
/// rejected before any request carries it.
pub(crate) struct ManagementCredentials {
    broker: Arc<dyn TokenBroker>,
    scopes: ScopeConfig,
    audience: String,
}

impl ManagementCredentials {
    pub(crate) fn new(broker: Arc<dyn TokenBroker>, provider: &ProviderConfig) -> Self {
        Self { broker, scopes: provider.scopes.clone(), audience: provider.audience() }
    }

    pub(crate) async fn acquire(
        &self,
        scope: ManagementScope,
        options: AcquireOptions,
    ) -> Result<ScopedCredential> {
        let requested = self.scopes.get(scope);
        let credential = self.broker.acquire(requested, &self.audience, options).await?;

        if !credential.grants(requested, &self.audience) {
            warn!(
                requested,
                issued = credential.scope(),
                audience = credential.audience(),
                "broker issued a credential for a different scope or audience"
            );
            return Err(IdentityError::AuthenticationRequired(format!(
                "no credential for scope '{requested}' on audience '{}'",
                self.audience
            )));
        }

        Ok(credential)
    }
}
