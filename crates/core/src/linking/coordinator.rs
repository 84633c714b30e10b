//! Identity link coordinator
//!
//! Linking is a multi-step handshake:
//!
//! ```text
//! Idle → AcquiringCredential → AwaitingSecondaryLogin → Linking → Linked
//!              │                        │                   │
//!              └────────────────────────┴───────────────────┴──► Failed
//! ```
//!
//! Unlinking is a single request. Both return the provider's authoritative
//! list with the primary identity removed, and neither touches caller state
//! on failure.

use std::sync::Arc;

use idlink_domain::{
    IdentityError, IdentityKey, LinkedIdentity, ManagementScope, ProviderConfig, Result,
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::identities::secondary_identities;
use super::state::LinkState;
use crate::auth::credentials::ManagementCredentials;
use crate::auth::ports::{
    AcquireOptions, SecondaryAuthenticator, SecondaryLogin, SecondaryLoginRequest, TokenBroker,
};
use crate::management::ports::ManagementApi;

/// Coordinates linking and unlinking of secondary identities
pub struct IdentityLinkCoordinator {
    credentials: ManagementCredentials,
    api: Arc<dyn ManagementApi>,
    authenticator: Arc<dyn SecondaryAuthenticator>,
    login: SecondaryLoginRequest,
    state: watch::Sender<LinkState>,
}

impl IdentityLinkCoordinator {
    /// Create a new coordinator
    pub fn new(
        broker: Arc<dyn TokenBroker>,
        api: Arc<dyn ManagementApi>,
        authenticator: Arc<dyn SecondaryAuthenticator>,
        provider: &ProviderConfig,
    ) -> Self {
        let (state, _) = watch::channel(LinkState::Idle);
        Self {
            credentials: ManagementCredentials::new(broker, provider),
            api,
            authenticator,
            login: SecondaryLoginRequest::for_provider(provider),
            state,
        }
    }

    /// Observe link progress.
    pub fn subscribe(&self) -> watch::Receiver<LinkState> {
        self.state.subscribe()
    }

    /// Current link state.
    pub fn state(&self) -> LinkState {
        self.state.borrow().clone()
    }

    /// Return to `Idle` (session switch or logout).
    pub fn reset(&self) {
        self.state.send_replace(LinkState::Idle);
    }

    /// Link a new login method to the account identified by `sub`.
    ///
    /// # Errors
    /// Any step failure is returned and the state ends in `Failed`.
    pub async fn link_account(&self, sub: &str) -> Result<Vec<LinkedIdentity>> {
        self.link_account_until_cancelled(sub, &CancellationToken::new()).await
    }

    /// Like [`link_account`](Self::link_account), but `cancel` aborts the
    /// secondary login step. Cancellation is only observed while waiting for
    /// the secondary login; the credential request and the link request run
    /// to completion.
    #[instrument(skip(self, cancel), fields(sub = %sub))]
    pub async fn link_account_until_cancelled(
        &self,
        sub: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<LinkedIdentity>> {
        let outcome = self.run_link(sub, cancel).await;

        match &outcome {
            Ok(identities) => {
                info!(linked = identities.len(), "account linked");
                self.transition(LinkState::Linked(identities.clone()));
            }
            Err(err) => {
                warn!(error = %err, error_type = err.label(), "account link failed");
                self.transition(LinkState::Failed(err.clone()));
            }
        }

        outcome
    }

    async fn run_link(&self, sub: &str, cancel: &CancellationToken) -> Result<Vec<LinkedIdentity>> {
        self.transition(LinkState::AcquiringCredential);
        let credential = self
            .credentials
            .acquire(ManagementScope::UpdateIdentities, AcquireOptions::CACHED)
            .await?;

        self.transition(LinkState::AwaitingSecondaryLogin);
        let login = tokio::select! {
            biased;
            () = cancel.cancelled() => SecondaryLogin::Cancelled,
            result = self.authenticator.authenticate(&self.login) => result?,
        };

        let link_with = match login {
            SecondaryLogin::Completed(token) if token.is_empty() => {
                return Err(IdentityError::InvalidInput(
                    "secondary login returned an empty identity token".into(),
                ));
            }
            SecondaryLogin::Completed(token) => token,
            SecondaryLogin::Cancelled => return Err(IdentityError::UserCancelled),
        };

        self.transition(LinkState::Linking);
        let identities = self.api.link_identity(sub, &link_with, &credential).await?;

        Ok(secondary_identities(identities, sub))
    }

    /// Detach a secondary identity from the account identified by `sub`.
    ///
    /// Unlinking the last secondary identity succeeds with an empty list.
    ///
    /// # Errors
    /// `InvalidInput` if `sub` names `target` as its primary identity (no
    /// request is made); otherwise whatever the credential or provider call
    /// reports. Nothing is retried.
    #[instrument(skip(self), fields(sub = %sub, target = %target))]
    pub async fn unlink_account(
        &self,
        sub: &str,
        target: &IdentityKey,
    ) -> Result<Vec<LinkedIdentity>> {
        if IdentityKey::from_sub(sub).is_ok_and(|primary| &primary == target) {
            return Err(IdentityError::InvalidInput(
                "the primary identity cannot be unlinked".into(),
            ));
        }

        let credential = self
            .credentials
            .acquire(ManagementScope::ManageUsers, AcquireOptions::CACHED)
            .await
            .inspect_err(|err| warn!(error = %err, "credential for unlink unavailable"))?;

        let remaining = self
            .api
            .unlink_identity(sub, target, &credential)
            .await
            .inspect_err(|err| warn!(error = %err, "account unlink failed"))?;

        let secondary = secondary_identities(remaining, sub);
        info!(remaining = secondary.len(), "account unlinked");
        Ok(secondary)
    }

    fn transition(&self, next: LinkState) {
        debug!(state = next.label(), "link state transition");
        self.state.send_replace(next);
    }
}
