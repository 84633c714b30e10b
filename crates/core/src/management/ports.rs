//! Port interface for the identity provider's management API
//!
//! Every call takes the credential explicitly so the scope used for each
//! request is decided by the service making it.

use async_trait::async_trait;
use idlink_domain::{
    IdentityKey, LinkedIdentity, MetadataDocument, RawIdToken, Result, ScopedCredential,
    UserRecord,
};

/// Trait for user record and identity operations
#[async_trait]
pub trait ManagementApi: Send + Sync {
    /// `GET /users/{sub}`
    async fn get_user(&self, sub: &str, credential: &ScopedCredential) -> Result<UserRecord>;

    /// `PATCH /users/{sub}` with only the `user_metadata` field.
    async fn update_user_metadata(
        &self,
        sub: &str,
        metadata: &MetadataDocument,
        credential: &ScopedCredential,
    ) -> Result<UserRecord>;

    /// `POST /users/{sub}/identities`. Returns the provider's full list,
    /// primary first.
    async fn link_identity(
        &self,
        sub: &str,
        link_with: &RawIdToken,
        credential: &ScopedCredential,
    ) -> Result<Vec<LinkedIdentity>>;

    /// `DELETE /users/{sub}/identities/{provider}/{user_id}`. Returns the
    /// remaining list, primary first.
    async fn unlink_identity(
        &self,
        sub: &str,
        target: &IdentityKey,
        credential: &ScopedCredential,
    ) -> Result<Vec<LinkedIdentity>>;
}
