//! Bearer material handed between the token broker, the secondary login and
//! the management API.
//!
//! Neither type prints its secret through `Debug`.

use std::fmt;

/// Bearer token authorised for exactly one scope and one audience.
///
/// Short-lived. Components hold it only for the duration of one request.
#[derive(Clone, PartialEq, Eq)]
pub struct ScopedCredential {
    token: String,
    scope: String,
    audience: String,
}

impl ScopedCredential {
    /// Wrap a token issued for `scope` on `audience`.
    pub fn new(
        token: impl Into<String>,
        scope: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self { token: token.into(), scope: scope.into(), audience: audience.into() }
    }

    /// Raw bearer token. Never log this.
    pub fn secret(&self) -> &str {
        &self.token
    }

    /// Scope string the broker issued the token for.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Audience the token is valid for.
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Whether this credential was issued for `scope` (one of its
    /// space-separated grants) and for `audience`.
    pub fn grants(&self, scope: &str, audience: &str) -> bool {
        let scope_granted = self.scope.split_whitespace().any(|granted| granted == scope);
        scope_granted && self.audience.trim_end_matches('/') == audience.trim_end_matches('/')
    }

    /// Value for the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for ScopedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedCredential")
            .field("token", &"<redacted>")
            .field("scope", &self.scope)
            .field("audience", &self.audience)
            .finish()
    }
}

/// Raw (encoded) ID token produced by a secondary login ceremony.
#[derive(Clone, PartialEq, Eq)]
pub struct RawIdToken(String);

impl RawIdToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Encoded token as sent in `link_with`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token is blank.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for RawIdToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawIdToken(<redacted>)")
    }
}
