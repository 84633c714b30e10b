//! Linked identity types
//!
//! Mirrors the `identities` array of a management API user record. The first
//! element is the primary identity; the rest are linked accounts.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::constants::SUB_SEPARATOR;
use crate::errors::{IdentityError, Result};

/// `(provider, user_id)` pair that identifies one login method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityKey {
    pub provider: String,
    pub user_id: String,
}

impl IdentityKey {
    /// Key from its parts.
    pub fn new(provider: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self { provider: provider.into(), user_id: user_id.into() }
    }

    /// Derive the key of the login method behind a `sub` such as
    /// `google-oauth2|1234`. The split happens at the first separator so
    /// per-connection ids may themselves contain `|`.
    pub fn from_sub(sub: &str) -> Result<Self> {
        match sub.split_once(SUB_SEPARATOR) {
            Some((provider, user_id)) if !provider.is_empty() && !user_id.is_empty() => {
                Ok(Self::new(provider, user_id))
            }
            _ => Err(IdentityError::InvalidInput(format!(
                "subject '{sub}' is not of the form provider{SUB_SEPARATOR}user_id"
            ))),
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.provider, SUB_SEPARATOR, self.user_id)
    }
}

/// One login method attached to a user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedIdentity {
    pub provider: String,
    /// Some connections report numeric ids; both forms decode to a string.
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
    #[serde(default)]
    pub connection: String,
    #[serde(default, rename = "isSocial")]
    pub is_social: bool,
    #[serde(default, rename = "profileData", skip_serializing_if = "Option::is_none")]
    pub profile_data: Option<IdentityProfileData>,
}

impl LinkedIdentity {
    /// `(provider, user_id)` of this identity.
    pub fn key(&self) -> IdentityKey {
        IdentityKey::new(self.provider.clone(), self.user_id.clone())
    }

    /// Whether this identity is the one named by `key`.
    pub fn matches(&self, key: &IdentityKey) -> bool {
        self.provider == key.provider && self.user_id == key.user_id
    }

    /// Email reported by the linked connection.
    pub fn email(&self) -> Option<&str> {
        self.profile_data.as_ref().and_then(|p| p.email.as_deref())
    }

    /// Display name reported by the linked connection.
    pub fn name(&self) -> Option<&str> {
        self.profile_data.as_ref().and_then(|p| p.name.as_deref())
    }
}

/// Profile fragment reported by the linked connection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityProfileData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(value) => value,
        StringOrNumber::Number(value) => value.to_string(),
    })
}
