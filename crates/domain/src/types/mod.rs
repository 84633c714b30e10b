//! Domain types and models

pub mod credential;
pub mod identity;
pub mod metadata;
pub mod profile;
pub mod record;

pub use credential::{RawIdToken, ScopedCredential};
pub use identity::{IdentityKey, IdentityProfileData, LinkedIdentity};
pub use metadata::MetadataDocument;
pub use profile::UserProfile;
pub use record::UserRecord;
