//! Session context - dependency injection container
//!
//! One `SessionContext` is built per signed-in session and torn down on
//! logout. It owns the services, the view model, and a cancellation token
//! that aborts any secondary login still waiting when the session ends.

use std::sync::Arc;

use idlink_core::{
    IdentityLinkCoordinator, ManagementApi, ProfileMetadataService, SecondaryAuthenticator,
    SessionViewModel, TokenBroker,
};
use idlink_domain::{Config, Result};
use idlink_infra::{config, ManagementApiClient};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Session context - holds all services and dependencies
pub struct SessionContext {
    /// Validated configuration this session was built from.
    pub config: Config,
    /// Metadata document service.
    pub metadata: Arc<ProfileMetadataService>,
    /// Link/unlink coordinator.
    pub linker: Arc<IdentityLinkCoordinator>,
    /// State rendered by the profile panel.
    pub view_model: Arc<SessionViewModel>,
    shutdown: CancellationToken,
    links: Mutex<LinkRegistry>,
}

impl SessionContext {
    /// Build a context from the process environment.
    ///
    /// Loads `.env` if present, then configuration via
    /// [`idlink_infra::config::load`].
    pub fn from_environment(
        broker: Arc<dyn TokenBroker>,
        authenticator: Arc<dyn SecondaryAuthenticator>,
    ) -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => info!(path = %path.display(), "Loaded .env"),
            Err(e) => debug!(error = %e, "No .env file loaded"),
        }

        let config = config::load()?;
        Self::new_with_config(config, broker, authenticator)
    }

    /// Build a context talking to the management API described by `config`.
    ///
    /// # Errors
    /// `IdentityError::Config` if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new_with_config(
        config: Config,
        broker: Arc<dyn TokenBroker>,
        authenticator: Arc<dyn SecondaryAuthenticator>,
    ) -> Result<Self> {
        config.validate()?;
        let api = Arc::new(ManagementApiClient::from_config(&config)?);

        info!(
            domain = %config.provider.domain,
            base_url = api.base_url(),
            "session context configured"
        );

        Ok(Self::with_management_api(config, broker, api, authenticator))
    }

    /// Wire the services around an already-built management API.
    pub fn with_management_api(
        config: Config,
        broker: Arc<dyn TokenBroker>,
        api: Arc<dyn ManagementApi>,
        authenticator: Arc<dyn SecondaryAuthenticator>,
    ) -> Self {
        let metadata = Arc::new(ProfileMetadataService::new(
            broker.clone(),
            api.clone(),
            &config.provider,
            config.session.metadata_form_key.clone(),
        ));
        let linker = Arc::new(IdentityLinkCoordinator::new(
            broker,
            api,
            authenticator,
            &config.provider,
        ));
        let view_model = Arc::new(SessionViewModel::new(metadata.clone(), linker.clone()));

        Self {
            config,
            metadata,
            linker,
            view_model,
            shutdown: CancellationToken::new(),
            links: Mutex::default(),
        }
    }

    /// Register a link attempt and return its id and cancellation token.
    ///
    /// The token is cancelled by [`cancel_pending_link`](Self::cancel_pending_link)
    /// or session shutdown. Starting a new attempt replaces the registered
    /// one without cancelling it.
    pub fn begin_link(&self) -> (u64, CancellationToken) {
        let token = self.shutdown.child_token();
        let mut links = self.links.lock();
        links.next_id += 1;
        let id = links.next_id;
        links.pending = Some((id, token.clone()));
        (id, token)
    }

    /// Unregister link attempt `id` if it is still the pending one.
    pub fn finish_link(&self, id: u64) {
        let mut links = self.links.lock();
        if links.pending.as_ref().is_some_and(|(pending, _)| *pending == id) {
            links.pending = None;
        }
    }

    /// Cancel the pending link attempt, if any.
    pub fn cancel_pending_link(&self) -> bool {
        match self.links.lock().pending.take() {
            Some((_, token)) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether [`shutdown`](Self::shutdown) has run.
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Tear the session down.
    ///
    /// Cancels any secondary login still in progress and clears the view
    /// model. Idempotent.
    pub fn shutdown(&self) {
        if self.shutdown.is_cancelled() {
            warn!("shutdown called on a session context that is already shut down");
            return;
        }

        info!("shutdown called on SessionContext");
        self.shutdown.cancel();
        self.view_model.logout();
    }
}

#[derive(Default)]
struct LinkRegistry {
    next_id: u64,
    pending: Option<(u64, CancellationToken)>,
}
