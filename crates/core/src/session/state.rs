//! Session state slices
//!
//! Each slice is replaced wholesale; nothing here is patched in place.

use idlink_domain::{
    impl_wire_name_conversions, IdentityError, LinkedIdentity, MetadataDocument, UserProfile,
};
use serde::{Deserialize, Serialize};

use crate::linking::LinkState;

/// Metadata as last observed for the active session
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MetadataSlice {
    /// No fetch has completed for this session yet.
    #[default]
    Unloaded,
    /// The record has no metadata, or the last fetch failed.
    Absent,
    /// The document from the latest successful read or write.
    Loaded(MetadataDocument),
}

impl MetadataSlice {
    /// The loaded document, if any.
    pub fn document(&self) -> Option<&MetadataDocument> {
        match self {
            Self::Loaded(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

impl From<Option<MetadataDocument>> for MetadataSlice {
    fn from(value: Option<MetadataDocument>) -> Self {
        value.map_or(Self::Absent, Self::Loaded)
    }
}

/// Secondary identities as last reported by the provider
#[derive(Debug, Clone, Default, PartialEq)]
pub enum IdentitySlice {
    #[default]
    /// No successful read yet.
    Unknown,
    /// Secondary identities, primary excluded.
    Known(Vec<LinkedIdentity>),
}

impl IdentitySlice {
    /// Known identities; empty while unknown.
    pub fn identities(&self) -> &[LinkedIdentity] {
        match self {
            Self::Known(list) => list,
            Self::Unknown => &[],
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

/// Operations whose failures are reported to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOperation {
    /// Mount or refresh.
    FetchMetadata,
    SubmitMetadata,
    LinkAccount,
    UnlinkAccount,
}

impl_wire_name_conversions!(SessionOperation {
    FetchMetadata => "fetch_metadata",
    SubmitMetadata => "submit_metadata",
    LinkAccount => "link_account",
    UnlinkAccount => "unlink_account",
});

/// The most recent failure, tagged with the operation that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedFailure {
    /// Operation that failed.
    pub operation: SessionOperation,
    /// Why it failed.
    pub error: IdentityError,
}

impl ReportedFailure {
    pub fn new(operation: SessionOperation, error: IdentityError) -> Self {
        Self { operation, error }
    }
}

/// Owned, read-only copy of the session state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    /// Active profile; `None` when signed out.
    pub profile: Option<UserProfile>,
    pub metadata: MetadataSlice,
    pub identities: IdentitySlice,
    /// Live state while a link attempt runs.
    pub link_state: LinkState,
    pub last_failure: Option<ReportedFailure>,
    /// Bumped on every session switch and logout.
    pub generation: u64,
}

impl SessionSnapshot {
    /// Whether a profile is mounted.
    pub fn is_authenticated(&self) -> bool {
        self.profile.is_some()
    }

    /// Subject of the active profile.
    pub fn sub(&self) -> Option<&str> {
        self.profile.as_ref().map(|p| p.sub.as_str())
    }
}
