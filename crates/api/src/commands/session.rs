//! Session commands
//!
//! The presentation boundary: a read-only view of the session plus the
//! commands the profile panel invokes.

use idlink_core::{IdentitySlice, MetadataSlice, ReportedFailure, SessionOperation, SessionSnapshot};
use idlink_domain::{IdentityError, LinkedIdentity, MetadataDocument, UserProfile};
use serde::Serialize;
use tracing::info;

use crate::context::SessionContext;
use crate::utils::command_helpers::{execute_command, CommandOutcome};

/// Serializable projection of [`SessionSnapshot`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    /// A profile is mounted.
    pub authenticated: bool,
    /// The mounted profile.
    pub profile: Option<UserProfile>,
    /// `unloaded`, `absent` or `loaded`.
    pub metadata_state: &'static str,
    /// Present only when `metadata_state` is `loaded`.
    pub metadata: Option<MetadataDocument>,
    /// `None` until the first successful fetch.
    pub identities: Option<Vec<LinkedIdentity>>,
    /// Label of the current link state.
    pub link_state: &'static str,
    /// Most recent failure in this session.
    pub last_failure: Option<ReportedFailure>,
}

impl From<SessionSnapshot> for SessionView {
    fn from(snapshot: SessionSnapshot) -> Self {
        let (metadata_state, metadata) = match snapshot.metadata {
            MetadataSlice::Unloaded => ("unloaded", None),
            MetadataSlice::Absent => ("absent", None),
            MetadataSlice::Loaded(doc) => ("loaded", Some(doc)),
        };
        let identities = match snapshot.identities {
            IdentitySlice::Unknown => None,
            IdentitySlice::Known(list) => Some(list),
        };

        Self {
            authenticated: snapshot.profile.is_some(),
            profile: snapshot.profile,
            metadata_state,
            metadata,
            identities,
            link_state: snapshot.link_state.label(),
            last_failure: snapshot.last_failure,
        }
    }
}

/// Current session state.
pub fn session_snapshot(ctx: &SessionContext) -> SessionView {
    ctx.view_model.snapshot().into()
}

/// Activate `profile` after (re-)authentication and load its metadata.
pub async fn mount_session(ctx: &SessionContext, profile: UserProfile) -> CommandOutcome<SessionView> {
    execute_command("session::mount_session", SessionOperation::FetchMetadata, move || async move {
        ctx.view_model.mount(profile).await?;
        Ok::<_, IdentityError>(session_snapshot(ctx))
    })
    .await
}

/// Re-fetch metadata and linked accounts.
pub async fn refresh_profile(ctx: &SessionContext) -> CommandOutcome<SessionView> {
    execute_command("session::refresh_profile", SessionOperation::FetchMetadata, || async {
        ctx.view_model.refresh().await?;
        Ok::<_, IdentityError>(session_snapshot(ctx))
    })
    .await
}

/// Store the form text as the user's metadata document.
pub async fn submit_metadata(ctx: &SessionContext, text: &str) -> CommandOutcome<MetadataDocument> {
    execute_command("session::submit_metadata", SessionOperation::SubmitMetadata, || {
        ctx.view_model.submit_metadata(text)
    })
    .await
}

/// Link another login method. Aborted by [`cancel_link`] or session
/// shutdown while the secondary login is open.
pub async fn link_account(ctx: &SessionContext) -> CommandOutcome<Vec<LinkedIdentity>> {
    let (link_id, token) = ctx.begin_link();
    let outcome = execute_command("session::link_account", SessionOperation::LinkAccount, || {
        ctx.view_model.link_account_cancellable(&token)
    })
    .await;
    ctx.finish_link(link_id);
    outcome
}

/// Abort the secondary login of a pending [`link_account`]. Returns whether
/// a link was pending.
pub fn cancel_link(ctx: &SessionContext) -> bool {
    let cancelled = ctx.cancel_pending_link();
    if cancelled {
        info!(command = "session::cancel_link", "pending link cancelled");
    }
    cancelled
}

/// Detach the identity `provider|user_id`.
pub async fn unlink_account(
    ctx: &SessionContext,
    provider: &str,
    user_id: &str,
) -> CommandOutcome<Vec<LinkedIdentity>> {
    execute_command("session::unlink_account", SessionOperation::UnlinkAccount, || {
        ctx.view_model.unlink_account(provider, user_id)
    })
    .await
}

/// End the session.
pub fn logout(ctx: &SessionContext) {
    ctx.shutdown();
}
