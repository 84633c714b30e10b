//! Account linking: the link/unlink state machine and the rule that keeps
//! the primary identity out of every user-facing list.

pub mod coordinator;
pub mod identities;
pub mod state;

pub use coordinator::IdentityLinkCoordinator;
pub use identities::{primary_key, secondary_identities};
pub use state::LinkState;
