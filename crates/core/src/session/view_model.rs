//! Session view model
//!
//! Owns the state the presentation layer renders: the active profile, its
//! metadata, its secondary identities, link progress and the last failure.
//! Every result is tagged with the session generation it was started under
//! and dropped if the session changed while it was in flight.

use std::sync::Arc;

use idlink_domain::{
    IdentityError, IdentityKey, LinkedIdentity, MetadataDocument, Result, UserProfile,
};
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::state::{
    IdentitySlice, MetadataSlice, ReportedFailure, SessionOperation, SessionSnapshot,
};
use crate::linking::{IdentityLinkCoordinator, LinkState};
use crate::metadata::{MetadataFetch, ProfileMetadataService};

#[derive(Debug, Default)]
struct SessionState {
    generation: u64,
    profile: Option<UserProfile>,
    metadata: MetadataSlice,
    identities: IdentitySlice,
    link_state: LinkState,
    /// A link attempt started under the current generation is running.
    linking: bool,
    last_failure: Option<ReportedFailure>,
}

impl SessionState {
    fn reset(&mut self, profile: Option<UserProfile>) {
        *self = Self { generation: self.generation + 1, profile, ..Self::default() };
    }
}

/// View model for one signed-in user at a time
pub struct SessionViewModel {
    metadata: Arc<ProfileMetadataService>,
    linker: Arc<IdentityLinkCoordinator>,
    state: RwLock<SessionState>,
}

impl SessionViewModel {
    /// Create a view model with no active session.
    pub fn new(metadata: Arc<ProfileMetadataService>, linker: Arc<IdentityLinkCoordinator>) -> Self {
        Self { metadata, linker, state: RwLock::new(SessionState::default()) }
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read();
        let link_state = if state.linking { self.linker.state() } else { state.link_state.clone() };

        SessionSnapshot {
            profile: state.profile.clone(),
            metadata: state.metadata.clone(),
            identities: state.identities.clone(),
            link_state,
            last_failure: state.last_failure.clone(),
            generation: state.generation,
        }
    }

    /// Observe link progress of the coordinator directly.
    pub fn subscribe_link_state(&self) -> watch::Receiver<LinkState> {
        self.linker.subscribe()
    }

    /// Activate `profile` and load its metadata.
    ///
    /// A different `sub` than the active one clears every slice before the
    /// fetch starts. Re-mounting the same `sub` only replaces the profile.
    ///
    /// # Errors
    /// `InvalidInput` if the profile's `sub` is blank; the session is cleared
    /// in that case. Fetch failures are not returned, they leave metadata
    /// `Absent` and are recorded as the last failure.
    pub async fn mount(&self, profile: UserProfile) -> Result<()> {
        let generation = self.begin_session(profile)?;
        self.load(generation).await;
        Ok(())
    }

    /// Same as [`mount`](Self::mount); reads better at re-authentication
    /// call sites.
    pub async fn switch_session(&self, profile: UserProfile) -> Result<()> {
        self.mount(profile).await
    }

    /// Synchronous part of [`mount`](Self::mount): install the profile and
    /// return the generation to load under.
    pub fn begin_session(&self, profile: UserProfile) -> Result<u64> {
        if profile.sub.trim().is_empty() {
            self.state.write().reset(None);
            self.linker.reset();
            return Err(IdentityError::InvalidInput("profile has an empty subject".into()));
        }

        let mut state = self.state.write();
        let same_user = state.profile.as_ref().is_some_and(|active| active.sub == profile.sub);

        if same_user {
            state.profile = Some(profile);
        } else {
            info!(sub = %profile.sub, "session switched");
            state.reset(Some(profile));
            self.linker.reset();
        }

        Ok(state.generation)
    }

    /// Re-fetch metadata and identities for the active session.
    ///
    /// # Errors
    /// `AuthenticationRequired` when no session is active.
    pub async fn refresh(&self) -> Result<()> {
        let (_, generation) = self.active_session()?;
        self.load(generation).await;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load(&self, generation: u64) {
        let Some(sub) = self.sub_for(generation) else {
            return;
        };

        let MetadataFetch { metadata, identities, failure } =
            self.metadata.fetch_metadata(&sub).await;

        self.apply(generation, |state| match failure {
            Some(error) => {
                state.metadata = MetadataSlice::Absent;
                state.last_failure =
                    Some(ReportedFailure::new(SessionOperation::FetchMetadata, error));
            }
            None => {
                state.metadata = MetadataSlice::from(metadata);
                if let Some(list) = identities {
                    state.identities = IdentitySlice::Known(list);
                }
                state.last_failure = None;
            }
        });
    }

    /// Save free text from the profile form as the metadata document.
    ///
    /// Concurrent submissions are not coalesced; the slice holds whichever
    /// response lands last.
    pub async fn submit_metadata(&self, text: &str) -> Result<MetadataDocument> {
        let (sub, generation) = self.active_session()?;
        let result = self.metadata.submit_form_metadata(&sub, text).await;

        self.settle(generation, SessionOperation::SubmitMetadata, &result, |state, doc| {
            state.metadata = MetadataSlice::Loaded(doc.clone());
        });
        result
    }

    /// Link another login method to the active account.
    pub async fn link_account(&self) -> Result<Vec<LinkedIdentity>> {
        self.link_account_cancellable(&CancellationToken::new()).await
    }

    /// Link another login method; `cancel` aborts the secondary login.
    pub async fn link_account_cancellable(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<LinkedIdentity>> {
        let (sub, generation) = {
            let mut state = self.state.write();
            let sub = state
                .profile
                .as_ref()
                .map(|p| p.sub.clone())
                .ok_or_else(no_active_session)?;
            state.linking = true;
            (sub, state.generation)
        };

        let result = self.linker.link_account_until_cancelled(&sub, cancel).await;

        self.apply(generation, |state| {
            state.linking = false;
            state.link_state = self.linker.state();
        });
        self.settle(generation, SessionOperation::LinkAccount, &result, |state, list| {
            state.identities = IdentitySlice::Known(list.clone());
        });
        result
    }

    /// Detach the identity `provider|user_id` from the active account.
    pub async fn unlink_account(
        &self,
        provider: &str,
        user_id: &str,
    ) -> Result<Vec<LinkedIdentity>> {
        let (sub, generation) = self.active_session()?;
        let target = IdentityKey::new(provider, user_id);
        let result = self.linker.unlink_account(&sub, &target).await;

        self.settle(generation, SessionOperation::UnlinkAccount, &result, |state, list| {
            state.identities = IdentitySlice::Known(list.clone());
        });
        result
    }

    /// Drop the session and everything derived from it.
    pub fn logout(&self) {
        self.state.write().reset(None);
        self.linker.reset();
        info!("session cleared");
    }

    fn active_session(&self) -> Result<(String, u64)> {
        let state = self.state.read();
        state
            .profile
            .as_ref()
            .map(|p| (p.sub.clone(), state.generation))
            .ok_or_else(no_active_session)
    }

    fn sub_for(&self, generation: u64) -> Option<String> {
        let state = self.state.read();
        if state.generation != generation {
            return None;
        }
        state.profile.as_ref().map(|p| p.sub.clone())
    }

    /// Apply `update` only if the session has not changed since `generation`.
    fn apply(&self, generation: u64, update: impl FnOnce(&mut SessionState)) -> bool {
        let mut state = self.state.write();
        if state.generation != generation {
            debug!(
                started = generation,
                current = state.generation,
                "discarding result from previous session"
            );
            return false;
        }
        update(&mut state);
        true
    }

    fn settle<T>(
        &self,
        generation: u64,
        operation: SessionOperation,
        result: &Result<T>,
        on_success: impl FnOnce(&mut SessionState, &T),
    ) {
        self.apply(generation, |state| match result {
            Ok(value) => {
                on_success(state, value);
                state.last_failure = None;
            }
            Err(error) => {
                state.last_failure = Some(ReportedFailure::new(operation, error.clone()));
            }
        });
    }
}

fn no_active_session() -> IdentityError {
    IdentityError::AuthenticationRequired("no active session".into())
}
