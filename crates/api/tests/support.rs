//! Shared fixtures for app-layer integration tests.
//!
//! The management API is a wiremock server; the token broker and secondary
//! authenticator are in-process stubs.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use idlink_app::SessionContext;
use idlink_core::{
    AcquireOptions, SecondaryAuthenticator, SecondaryLogin, SecondaryLoginRequest, TokenBroker,
};
use idlink_domain::{
    Config, IdentityError, ProviderConfig, RawIdToken, Result as DomainResult, ScopedCredential,
};
use parking_lot::Mutex;
use tokio::sync::Notify;
use wiremock::MockServer;

pub const SUB: &str = "auth0|5f7c8ec7c33c6c004bbafe82";
pub const SUB_PATH: &str = "/api/v2/users/auth0%7C5f7c8ec7c33c6c004bbafe82";

/// Issues `token-{scope}` and records every request.
#[derive(Default)]
pub struct StubBroker {
    pub requests: Mutex<Vec<(String, bool)>>,
    pub expired: Mutex<bool>,
}

#[async_trait]
impl TokenBroker for StubBroker {
    async fn acquire(
        &self,
        scope: &str,
        audience: &str,
        options: AcquireOptions,
    ) -> DomainResult<ScopedCredential> {
        self.requests.lock().push((scope.to_string(), options.force_refresh));
        if *self.expired.lock() {
            return Err(IdentityError::AuthenticationRequired("login_required".into()));
        }
        Ok(ScopedCredential::new(format!("token-{scope}"), scope, audience))
    }
}

/// Secondary login that answers with a fixed token, a cancellation, or
/// never (until the caller cancels).
pub struct StubAuthenticator {
    outcome: Option<SecondaryLogin>,
    pub started: Notify,
}

impl StubAuthenticator {
    pub fn completing(token: &str) -> Self {
        Self { outcome: Some(SecondaryLogin::Completed(RawIdToken::new(token))), started: Notify::new() }
    }

    pub fn closing_popup() -> Self {
        Self { outcome: Some(SecondaryLogin::Cancelled), started: Notify::new() }
    }

    pub fn never_completing() -> Self {
        Self { outcome: None, started: Notify::new() }
    }
}

#[async_trait]
impl SecondaryAuthenticator for StubAuthenticator {
    async fn authenticate(
        &self,
        _request: &SecondaryLoginRequest,
    ) -> DomainResult<SecondaryLogin> {
        self.started.notify_one();
        match &self.outcome {
            Some(outcome) => Ok(outcome.clone()),
            None => std::future::pending().await,
        }
    }
}

pub fn config_for(server: &MockServer) -> Config {
    let mut provider = ProviderConfig::new("tenant.test", "spa-client");
    provider.management_base_url = Some(format!("{}/api/v2", server.uri()));
    let mut config = Config { provider, ..Config::default() };
    config.http.use_system_proxy = false;
    config
}

pub struct TestSession {
    pub ctx: Arc<SessionContext>,
    pub broker: Arc<StubBroker>,
    pub authenticator: Arc<StubAuthenticator>,
}

pub fn session(server: &MockServer, authenticator: StubAuthenticator) -> TestSession {
    let broker = Arc::new(StubBroker::default());
    let authenticator = Arc::new(authenticator);
    let ctx = SessionContext::new_with_config(config_for(server), broker.clone(), authenticator.clone())
        .expect("session context");
    TestSession { ctx: Arc::new(ctx), broker, authenticator }
}
