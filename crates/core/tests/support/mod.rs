//! Shared test helpers for `idlink-core` integration tests.
//!
//! In-memory doubles for the three ports. Each records its calls so tests can
//! assert which scopes were requested and which provider requests were made.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use idlink_core::{
    AcquireOptions, IdentityLinkCoordinator, ManagementApi, ProfileMetadataService,
    SecondaryAuthenticator, SecondaryLogin, SecondaryLoginRequest, SessionViewModel, TokenBroker,
};
use idlink_domain::constants::DEFAULT_METADATA_FORM_KEY;
use idlink_domain::{
    IdentityError, IdentityKey, LinkedIdentity, MetadataDocument, ProviderConfig, RawIdToken,
    Result as DomainResult, ScopedCredential, UserProfile, UserRecord,
};
use parking_lot::Mutex;
use tokio::sync::{oneshot, Notify};

pub const PRIMARY_SUB: &str = "auth0|primary";
pub const DOMAIN: &str = "tenant.example.com";
pub const CLIENT_ID: &str = "spa-client";
pub const AUDIENCE: &str = "https://tenant.example.com/api/v2/";

pub fn provider() -> ProviderConfig {
    ProviderConfig::new(DOMAIN, CLIENT_ID)
}

pub fn identity(provider: &str, user_id: &str) -> LinkedIdentity {
    LinkedIdentity {
        provider: provider.to_string(),
        user_id: user_id.to_string(),
        connection: provider.to_string(),
        is_social: provider != "auth0",
        profile_data: None,
    }
}

pub fn primary() -> LinkedIdentity {
    identity("auth0", "primary")
}

pub fn profile(sub: &str) -> UserProfile {
    UserProfile::new(sub).with_name("Jane Doe").with_email("jane@example.com")
}

pub fn record(metadata: Option<MetadataDocument>, identities: Vec<LinkedIdentity>) -> UserRecord {
    UserRecord { user_id: None, user_metadata: metadata, identities }
}

pub fn rejected(status: u16) -> IdentityError {
    IdentityError::ProviderRejected { status, reason: "rejected".to_string() }
}

/// Records every `acquire` as `(scope, force_refresh)`.
///
/// Issues a credential for the requested scope and audience unless told to
/// issue a fixed scope instead.
#[derive(Default)]
pub struct MockTokenBroker {
    calls: Mutex<Vec<(String, bool)>>,
    audiences: Mutex<Vec<String>>,
    failure: Mutex<Option<IdentityError>>,
    issued_scope: Option<String>,
}

impl MockTokenBroker {
    pub fn failing(error: IdentityError) -> Self {
        Self { failure: Mutex::new(Some(error)), ..Self::default() }
    }

    pub fn issuing_scope(scope: &str) -> Self {
        Self { issued_scope: Some(scope.to_string()), ..Self::default() }
    }

    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().clone()
    }

    pub fn audiences(&self) -> Vec<String> {
        self.audiences.lock().clone()
    }
}

#[async_trait]
impl TokenBroker for MockTokenBroker {
    async fn acquire(
        &self,
        scope: &str,
        audience: &str,
        options: AcquireOptions,
    ) -> DomainResult<ScopedCredential> {
        self.calls.lock().push((scope.to_string(), options.force_refresh));
        self.audiences.lock().push(audience.to_string());
        if let Some(err) = self.failure.lock().clone() {
            return Err(err);
        }
        let granted = self.issued_scope.as_deref().unwrap_or(scope);
        Ok(ScopedCredential::new(format!("token-{granted}"), granted, audience))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    GetUser { sub: String, scope: String },
    UpdateMetadata { sub: String, metadata: MetadataDocument, scope: String },
    Link { sub: String, link_with: String, scope: String },
    Unlink { sub: String, target: IdentityKey, scope: String },
}

/// Scripted management API.
///
/// `get_user` answers per `sub`; mutations answer with whatever was scripted
/// last. A held `get_user` call blocks until the returned sender fires; held
/// metadata updates are released one sender per call, in call order.
#[derive(Default)]
pub struct MockManagementApi {
    calls: Mutex<Vec<ApiCall>>,
    users: Mutex<HashMap<String, DomainResult<UserRecord>>>,
    update_response: Mutex<Option<DomainResult<UserRecord>>>,
    link_response: Mutex<Option<DomainResult<Vec<LinkedIdentity>>>>,
    unlink_response: Mutex<Option<DomainResult<Vec<LinkedIdentity>>>>,
    held_get: Mutex<Option<oneshot::Receiver<()>>>,
    held_updates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    pub get_started: Notify,
    pub update_started: Notify,
}

impl MockManagementApi {
    pub fn with_user(self, sub: &str, response: DomainResult<UserRecord>) -> Self {
        self.set_user(sub, response);
        self
    }

    pub fn set_user(&self, sub: &str, response: DomainResult<UserRecord>) {
        self.users.lock().insert(sub.to_string(), response);
    }

    pub fn set_update_response(&self, response: DomainResult<UserRecord>) {
        *self.update_response.lock() = Some(response);
    }

    pub fn set_link_response(&self, response: DomainResult<Vec<LinkedIdentity>>) {
        *self.link_response.lock() = Some(response);
    }

    pub fn set_unlink_response(&self, response: DomainResult<Vec<LinkedIdentity>>) {
        *self.unlink_response.lock() = Some(response);
    }

    /// Block the next `get_user` until the returned sender is used or dropped.
    pub fn hold_next_get(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.held_get.lock() = Some(rx);
        tx
    }

    /// Queue a hold for the next metadata update not already held.
    pub fn hold_next_update(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.held_updates.lock().push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl ManagementApi for MockManagementApi {
    async fn get_user(
        &self,
        sub: &str,
        credential: &ScopedCredential,
    ) -> DomainResult<UserRecord> {
        self.record(ApiCall::GetUser {
            sub: sub.to_string(),
            scope: credential.scope().to_string(),
        });
        self.get_started.notify_one();

        let held = self.held_get.lock().take();
        if let Some(rx) = held {
            let _ = rx.await;
        }

        self.users
            .lock()
            .get(sub)
            .cloned()
            .unwrap_or_else(|| Err(rejected(404)))
    }

    async fn update_user_metadata(
        &self,
        sub: &str,
        metadata: &MetadataDocument,
        credential: &ScopedCredential,
    ) -> DomainResult<UserRecord> {
        self.record(ApiCall::UpdateMetadata {
            sub: sub.to_string(),
            metadata: metadata.clone(),
            scope: credential.scope().to_string(),
        });
        self.update_started.notify_one();

        let held = self.held_updates.lock().pop_front();
        if let Some(rx) = held {
            let _ = rx.await;
        }

        self.update_response
            .lock()
            .clone()
            .unwrap_or_else(|| Ok(record(Some(metadata.clone()), Vec::new())))
    }

    async fn link_identity(
        &self,
        sub: &str,
        link_with: &RawIdToken,
        credential: &ScopedCredential,
    ) -> DomainResult<Vec<LinkedIdentity>> {
        self.record(ApiCall::Link {
            sub: sub.to_string(),
            link_with: link_with.as_str().to_string(),
            scope: credential.scope().to_string(),
        });
        self.link_response.lock().clone().unwrap_or_else(|| Err(rejected(500)))
    }

    async fn unlink_identity(
        &self,
        sub: &str,
        target: &IdentityKey,
        credential: &ScopedCredential,
    ) -> DomainResult<Vec<LinkedIdentity>> {
        self.record(ApiCall::Unlink {
            sub: sub.to_string(),
            target: target.clone(),
            scope: credential.scope().to_string(),
        });
        self.unlink_response.lock().clone().unwrap_or_else(|| Err(rejected(500)))
    }
}

/// Secondary login double.
///
/// Answers with the scripted outcome, or never answers when `pending`.
/// When `held`, it signals `started` and waits for the release sender.
#[derive(Default)]
pub struct MockSecondaryAuthenticator {
    outcome: Mutex<Option<DomainResult<SecondaryLogin>>>,
    pending: bool,
    held: Mutex<Option<oneshot::Receiver<()>>>,
    pub started: Notify,
    requests: Mutex<Vec<SecondaryLoginRequest>>,
}

impl MockSecondaryAuthenticator {
    pub fn completing(token: &str) -> Self {
        Self::answering(Ok(SecondaryLogin::Completed(RawIdToken::new(token))))
    }

    pub fn answering(outcome: DomainResult<SecondaryLogin>) -> Self {
        Self { outcome: Mutex::new(Some(outcome)), ..Self::default() }
    }

    pub fn never_completing() -> Self {
        Self { pending: true, ..Self::default() }
    }

    pub fn set_outcome(&self, outcome: DomainResult<SecondaryLogin>) {
        *self.outcome.lock() = Some(outcome);
    }

    pub fn hold(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.held.lock() = Some(rx);
        tx
    }

    pub fn invocations(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<SecondaryLoginRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl SecondaryAuthenticator for MockSecondaryAuthenticator {
    async fn authenticate(
        &self,
        request: &SecondaryLoginRequest,
    ) -> DomainResult<SecondaryLogin> {
        self.requests.lock().push(request.clone());
        self.started.notify_one();

        if self.pending {
            std::future::pending::<()>().await;
        }

        let held = self.held.lock().take();
        if let Some(rx) = held {
            let _ = rx.await;
        }

        self.outcome.lock().clone().unwrap_or(Ok(SecondaryLogin::Cancelled))
    }
}

/// All collaborators of one session, wired the way the app layer wires them.
pub struct Harness {
    pub broker: Arc<MockTokenBroker>,
    pub api: Arc<MockManagementApi>,
    pub authenticator: Arc<MockSecondaryAuthenticator>,
    pub metadata: Arc<ProfileMetadataService>,
    pub linker: Arc<IdentityLinkCoordinator>,
    pub view_model: Arc<SessionViewModel>,
}

impl Harness {
    pub fn new(
        broker: MockTokenBroker,
        api: MockManagementApi,
        authenticator: MockSecondaryAuthenticator,
    ) -> Self {
        let broker = Arc::new(broker);
        let api = Arc::new(api);
        let authenticator = Arc::new(authenticator);
        let provider = provider();

        let metadata = Arc::new(ProfileMetadataService::new(
            broker.clone(),
            api.clone(),
            &provider,
            DEFAULT_METADATA_FORM_KEY,
        ));
        let linker = Arc::new(IdentityLinkCoordinator::new(
            broker.clone(),
            api.clone(),
            authenticator.clone(),
            &provider,
        ));
        let view_model = Arc::new(SessionViewModel::new(metadata.clone(), linker.clone()));

        Self { broker, api, authenticator, metadata, linker, view_model }
    }

    pub fn with_api(api: MockManagementApi) -> Self {
        Self::new(MockTokenBroker::default(), api, MockSecondaryAuthenticator::default())
    }
}
