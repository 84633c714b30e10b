//! User profile types
//!
//! Public profile of the authenticated user, as issued by the identity
//! provider at login.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Immutable profile snapshot.
///
/// `sub` is an opaque, stable subject identifier. It is often, but not
/// always, of the form `provider|user_id`.
///
/// Created on successful authentication and replaced wholesale on
/// re-authentication. Claims not modelled explicitly are kept in `claims`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Subject identifier.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl UserProfile {
    /// Profile with only a subject.
    pub fn new(sub: impl Into<String>) -> Self {
        Self { sub: sub.into(), name: None, email: None, picture: None, claims: Map::new() }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }
}
