//! Management API user record

use serde::{Deserialize, Serialize};

use super::identity::LinkedIdentity;
use super::metadata::MetadataDocument;

/// The slice of `GET/PATCH /users/{sub}` responses this core reads.
///
/// `identities` is the provider's raw list, primary first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_metadata: Option<MetadataDocument>,
    #[serde(default)]
    pub identities: Vec<LinkedIdentity>,
}
