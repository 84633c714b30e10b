//! Management API client
//!
//! HTTP implementation of [`ManagementApi`] against the provider's
//! `/api/v2` user endpoints. Every request carries the caller's scoped
//! credential; this client never acquires or stores one itself.

use async_trait::async_trait;
use idlink_core::ManagementApi;
use idlink_domain::{
    Config, IdentityError, IdentityKey, LinkedIdentity, MetadataDocument, RawIdToken, Result,
    ScopedCredential, UserRecord,
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::errors::InfraError;
use crate::http::HttpClient;

#[derive(Serialize)]
struct UpdateMetadataBody<'a> {
    user_metadata: &'a MetadataDocument,
}

#[derive(Serialize)]
struct LinkBody<'a> {
    link_with: &'a str,
}

#[derive(Serialize)]
struct UnlinkBody<'a> {
    id: &'a str,
    provider: &'a str,
    user_id: &'a str,
}

/// Error payload returned by the management API on non-2xx responses
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
}

/// Management API client
#[derive(Clone)]
pub struct ManagementApiClient {
    http: HttpClient,
    base_url: String,
}

impl ManagementApiClient {
    /// Create a client for `base_url` (e.g. `https://tenant.auth0.com/api/v2`).
    pub fn new(base_url: impl Into<String>, http: HttpClient) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Build a client from the provider and HTTP configuration sections.
    ///
    /// # Errors
    /// `IdentityError::Config` if the resolved base URL is not an absolute
    /// HTTP(S) URL.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.provider.management_base_url();
        let parsed = Url::parse(&base_url).map_err(|e| {
            IdentityError::Config(format!("invalid management base URL '{base_url}': {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(IdentityError::Config(format!(
                "management base URL must use http or https: {base_url}"
            )));
        }

        let http = HttpClient::from_config(&config.http)?;
        Ok(Self::new(base_url, http))
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn user_url(&self, sub: &str) -> String {
        format!("{}/users/{}", self.base_url, urlencoding::encode(sub))
    }

    fn identities_url(&self, sub: &str) -> String {
        format!("{}/identities", self.user_url(sub))
    }

    fn identity_url(&self, sub: &str, target: &IdentityKey) -> String {
        format!(
            "{}/{}/{}",
            self.identities_url(sub),
            urlencoding::encode(&target.provider),
            urlencoding::encode(&target.user_id)
        )
    }

    fn authorized(
        &self,
        method: Method,
        url: &str,
        credential: &ScopedCredential,
    ) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(AUTHORIZATION, credential.authorization_header())
            .header(CONTENT_TYPE, "application/json")
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|err| {
                debug!(%status, error = %err, "failed to read error response body");
                String::new()
            });
            let error = map_status_error(status, &body);
            warn!(%status, error = %error, "management API rejected request");
            return Err(error);
        }

        let bytes = response.bytes().await.map_err(|e| IdentityError::from(InfraError::from(e)))?;
        serde_json::from_slice(&bytes).map_err(|e| IdentityError::from(InfraError::from(e)))
    }
}

#[async_trait]
impl ManagementApi for ManagementApiClient {
    #[instrument(skip(self, credential), fields(sub = %sub))]
    async fn get_user(&self, sub: &str, credential: &ScopedCredential) -> Result<UserRecord> {
        let request = self.authorized(Method::GET, &self.user_url(sub), credential);
        let record: UserRecord = self.execute(request).await?;
        debug!(identities = record.identities.len(), "user record fetched");
        Ok(record)
    }

    #[instrument(skip(self, metadata, credential), fields(sub = %sub))]
    async fn update_user_metadata(
        &self,
        sub: &str,
        metadata: &MetadataDocument,
        credential: &ScopedCredential,
    ) -> Result<UserRecord> {
        let request = self
            .authorized(Method::PATCH, &self.user_url(sub), credential)
            .json(&UpdateMetadataBody { user_metadata: metadata });
        self.execute(request).await
    }

    #[instrument(skip(self, link_with, credential), fields(sub = %sub))]
    async fn link_identity(
        &self,
        sub: &str,
        link_with: &RawIdToken,
        credential: &ScopedCredential,
    ) -> Result<Vec<LinkedIdentity>> {
        let request = self
            .authorized(Method::POST, &self.identities_url(sub), credential)
            .json(&LinkBody { link_with: link_with.as_str() });
        self.execute(request).await
    }

    #[instrument(skip(self, credential), fields(sub = %sub, target = %target))]
    async fn unlink_identity(
        &self,
        sub: &str,
        target: &IdentityKey,
        credential: &ScopedCredential,
    ) -> Result<Vec<LinkedIdentity>> {
        let request = self
            .authorized(Method::DELETE, &self.identity_url(sub, target), credential)
            .json(&UnlinkBody { id: sub, provider: &target.provider, user_id: &target.user_id });
        self.execute(request).await
    }
}

/// Map a non-2xx response to `ProviderRejected`.
///
/// The reason is the provider's `message` (falling back to `error`) when the
/// body is the standard JSON error payload, otherwise the raw body.
fn map_status_error(status: StatusCode, body: &str) -> IdentityError {
    let parsed = serde_json::from_str::<ProviderErrorBody>(body).ok();

    let reason = match parsed {
        Some(ProviderErrorBody { message: Some(message), error_code, .. }) => match error_code {
            Some(code) => format!("{message} ({code})"),
            None => message,
        },
        Some(ProviderErrorBody { error: Some(error), .. }) => error,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status.canonical_reason().unwrap_or("unknown status").to_string(),
    };

    IdentityError::ProviderRejected { status: status.as_u16(), reason }
}
