//! Primary-identity exclusion
//!
//! The provider returns identity lists with the primary identity included.
//! It is removed by `(provider, user_id)` equality, never by position, after
//! the initial fetch and after every mutation.

use idlink_domain::{IdentityKey, LinkedIdentity};
use tracing::warn;

/// Key of the primary identity for `sub`.
///
/// A `provider|user_id` subject names it directly. Any other subject is
/// opaque, and the provider's first listed identity is taken as primary.
pub fn primary_key(sub: &str, identities: &[LinkedIdentity]) -> Option<IdentityKey> {
    IdentityKey::from_sub(sub).ok().or_else(|| identities.first().map(LinkedIdentity::key))
}

/// Drop the primary identity of `sub` from a provider identity list.
///
/// Order of the remaining entries is preserved.
pub fn secondary_identities(identities: Vec<LinkedIdentity>, sub: &str) -> Vec<LinkedIdentity> {
    let Some(primary) = primary_key(sub, &identities) else {
        return identities;
    };

    let total = identities.len();
    let secondary: Vec<LinkedIdentity> =
        identities.into_iter().filter(|identity| !identity.matches(&primary)).collect();

    if secondary.len() == total && total > 0 {
        warn!(primary = %primary, total, "primary identity missing from provider identity list");
    }

    secondary
}
