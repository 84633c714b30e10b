//! Link flow states

use idlink_domain::{IdentityError, LinkedIdentity};

/// Progress of the most recent link attempt.
///
/// `Linked` and `Failed` are terminal; a new attempt starts again from
/// `AcquiringCredential`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LinkState {
    #[default]
    /// No link attempt in this session.
    Idle,
    /// Requesting the identities-update credential.
    AcquiringCredential,
    /// Waiting for the secondary login ceremony.
    AwaitingSecondaryLogin,
    /// Link request sent to the provider.
    Linking,
    /// Linked; carries the secondary identities after the link.
    Linked(Vec<LinkedIdentity>),
    /// The attempt failed or was cancelled.
    Failed(IdentityError),
}

impl LinkState {
    /// `Linked` or `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Linked(_) | Self::Failed(_))
    }

    /// Any state between `Idle` and a terminal state.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::AcquiringCredential | Self::AwaitingSecondaryLogin | Self::Linking)
    }

    /// Stable label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AcquiringCredential => "acquiring_credential",
            Self::AwaitingSecondaryLogin => "awaiting_secondary_login",
            Self::Linking => "linking",
            Self::Linked(_) => "linked",
            Self::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(LinkState::Linked(Vec::new()).is_terminal());
        assert!(LinkState::Failed(IdentityError::UserCancelled).is_terminal());
        assert!(!LinkState::Idle.is_terminal());
        assert!(LinkState::AwaitingSecondaryLogin.is_in_progress());
        assert!(!LinkState::Idle.is_in_progress());
    }
}
