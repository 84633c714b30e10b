//! Profile metadata service
//!
//! Reads and replaces the free-form `user_metadata` document on the user
//! record. Reads use the read scope from cache; writes always force a fresh
//! credential for the update scope.

use std::sync::Arc;

use idlink_domain::{
    IdentityError, LinkedIdentity, ManagementScope, MetadataDocument, ProviderConfig, Result,
};
use tracing::{debug, info, instrument, warn};

use crate::auth::credentials::ManagementCredentials;
use crate::auth::ports::{AcquireOptions, TokenBroker};
use crate::linking::identities::secondary_identities;
use crate::management::ports::ManagementApi;

/// Result of [`ProfileMetadataService::fetch_metadata`]
///
/// A fetch never fails outright: on error both payloads are `None` and
/// `failure` carries the cause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataFetch {
    /// `None` when the record carries no metadata or the fetch failed.
    pub metadata: Option<MetadataDocument>,
    /// Secondary identities from the same read, primary excluded.
    pub identities: Option<Vec<LinkedIdentity>>,
    /// Why the fetch failed, if it did.
    pub failure: Option<IdentityError>,
}

impl MetadataFetch {
    fn failed(error: IdentityError) -> Self {
        Self { metadata: None, identities: None, failure: Some(error) }
    }

    /// Whether the fetch failed.
    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// Service for the user metadata document
pub struct ProfileMetadataService {
    credentials: ManagementCredentials,
    api: Arc<dyn ManagementApi>,
    form_key: String,
}

impl ProfileMetadataService {
    /// Create a new metadata service
    pub fn new(
        broker: Arc<dyn TokenBroker>,
        api: Arc<dyn ManagementApi>,
        provider: &ProviderConfig,
        form_key: impl Into<String>,
    ) -> Self {
        Self {
            credentials: ManagementCredentials::new(broker, provider),
            api,
            form_key: form_key.into(),
        }
    }

    /// Key used by [`submit_form_metadata`](Self::submit_form_metadata).
    pub fn form_key(&self) -> &str {
        &self.form_key
    }

    /// Fetch the metadata document and linked identities for `sub`.
    ///
    /// `sub` is used verbatim in the request path; its format only matters
    /// for telling the primary identity apart.
    #[instrument(skip(self), fields(sub = %sub))]
    pub async fn fetch_metadata(&self, sub: &str) -> MetadataFetch {
        match self.try_fetch(sub).await {
            Ok(fetch) => {
                debug!(
                    has_metadata = fetch.metadata.is_some(),
                    identities = fetch.identities.as_ref().map_or(0, Vec::len),
                    "metadata fetched"
                );
                fetch
            }
            Err(err) => {
                warn!(error = %err, error_type = err.label(), "metadata fetch failed");
                MetadataFetch::failed(err)
            }
        }
    }

    async fn try_fetch(&self, sub: &str) -> Result<MetadataFetch> {
        let credential =
            self.credentials.acquire(ManagementScope::Read, AcquireOptions::CACHED).await?;

        let record = self.api.get_user(sub, &credential).await?;

        Ok(MetadataFetch {
            metadata: record.user_metadata,
            identities: Some(secondary_identities(record.identities, sub)),
            failure: None,
        })
    }

    /// Replace the metadata document for `sub` and return the provider's
    /// echo of it.
    ///
    /// # Errors
    /// Credential or provider failures are returned unchanged.
    #[instrument(skip(self, metadata), fields(sub = %sub, keys = metadata.len()))]
    pub async fn update_metadata(
        &self,
        sub: &str,
        metadata: &MetadataDocument,
    ) -> Result<MetadataDocument> {
        let credential = self
            .credentials
            .acquire(ManagementScope::UpdateMetadata, AcquireOptions::FORCE_REFRESH)
            .await?;

        let record = self.api.update_user_metadata(sub, metadata, &credential).await?;
        let echoed = record.user_metadata.unwrap_or_default();

        info!(keys = echoed.len(), "metadata updated");
        Ok(echoed)
    }

    /// Store free text from the profile form under the configured key.
    pub async fn submit_form_metadata(&self, sub: &str, text: &str) -> Result<MetadataDocument> {
        let document = MetadataDocument::new().with_entry(self.form_key.clone(), text);
        self.update_metadata(sub, &document).await
    }
}
