//! Session registry: creates, tracks, and routes moves to live sessions.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parlor_protocol::{ParticipantId, SessionId, Target, Variant, ViewState};
use parlor_session::GameSession;
use tokio::sync::{mpsc, Mutex};

use crate::actor::{spawn_session, LiveMap};
use crate::{Ledger, NoticeSender, RegistryConfig, RegistryError, SessionHandle};

/// Counter for registry-allocated session ids.
///
/// Starts high so allocated ids don't collide with small message ids in
/// tests and demos that call [`SessionRegistry::open`] directly.
static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1 << 32);

/// Owns the set of live sessions.
///
/// This is the single entry point for everything that touches a match:
/// challenges come in through [`create`](Self::create) /
/// [`open`](Self::open), moves through [`dispatch`](Self::dispatch). The
/// registry itself never mutates a `GameSession`; it forwards commands to
/// the session's actor.
///
/// ## Lifecycle
///
/// ```text
/// create() ──→ [live] ──dispatch()…──→ WonBy / Drawn ──→ removed
///                 │
///                 └──(idle timeout)──→ Abandoned ──→ removed
/// ```
///
/// Construct one at startup and pass it by reference to whatever handles
/// commands and interactions.
pub struct SessionRegistry<L: Ledger> {
    config: RegistryConfig,
    ledger: Arc<L>,
    live: LiveMap,
    notices: NoticeSender,
}

impl<L: Ledger> SessionRegistry<L> {
    /// Creates an empty registry whose notices go nowhere.
    pub fn new(config: RegistryConfig, ledger: L) -> Self {
        // The receiver is dropped right away; sends are silently ignored.
        let (notices, _) = mpsc::unbounded_channel();
        Self::with_notices(config, ledger, notices)
    }

    /// Creates an empty registry that publishes [`SessionNotice`]s to
    /// `notices`.
    ///
    /// [`SessionNotice`]: crate::SessionNotice
    pub fn with_notices(
        config: RegistryConfig,
        ledger: L,
        notices: NoticeSender,
    ) -> Self {
        Self {
            config,
            ledger: Arc::new(ledger),
            live: Arc::new(Mutex::new(HashMap::new())),
            notices,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Starts a match under a freshly allocated session id.
    ///
    /// # Errors
    /// [`RegistryError::SelfChallenge`] if `challenger == opponent`; no
    /// session is created.
    pub async fn create(
        &self,
        challenger: ParticipantId,
        opponent: ParticipantId,
        variant: Variant,
    ) -> Result<SessionId, RegistryError> {
        let session_id =
            SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed));
        self.open(session_id, challenger, opponent, variant).await?;
        Ok(session_id)
    }

    /// Starts a match under a caller-chosen id, typically the id of the
    /// message that carried the challenge.
    ///
    /// # Errors
    /// - [`RegistryError::SelfChallenge`] if `challenger == opponent`
    /// - [`RegistryError::DuplicateSession`] if `session_id` is still live
    pub async fn open(
        &self,
        session_id: SessionId,
        challenger: ParticipantId,
        opponent: ParticipantId,
        variant: Variant,
    ) -> Result<(), RegistryError> {
        if challenger == opponent {
            return Err(RegistryError::SelfChallenge(challenger));
        }

        let mut live = self.live.lock().await;
        if live.get(&session_id).is_some_and(|h| !h.is_closed()) {
            return Err(RegistryError::DuplicateSession(session_id));
        }

        let handle = spawn_session(
            session_id,
            GameSession::new(variant, challenger, opponent),
            &self.config,
            Arc::clone(&self.ledger),
            Arc::clone(&self.live),
            self.notices.clone(),
        );
        live.insert(session_id, handle);
        tracing::info!(%session_id, %variant, "session created");
        Ok(())
    }

    /// Routes a move to a live session and returns the resulting view.
    ///
    /// Moves on one session are applied in the order they reach its actor;
    /// moves on different sessions never wait on each other. When the move
    /// ends the match, the session is removed from the live map before this
    /// returns, so a later dispatch reports `UnknownSession`.
    ///
    /// # Errors
    /// - [`RegistryError::UnknownSession`] if the id isn't live
    /// - [`RegistryError::Move`] if the session rejected the move
    pub async fn dispatch(
        &self,
        session_id: SessionId,
        actor: ParticipantId,
        target: Target,
    ) -> Result<ViewState, RegistryError> {
        let handle = self.handle(session_id).await?;
        match handle.submit(actor, target).await {
            Ok(view) => {
                if view.is_terminal() {
                    self.forget(&handle).await;
                }
                Ok(view)
            }
            Err(RegistryError::UnknownSession(id)) => {
                tracing::warn!(session_id = %id, "session actor unavailable");
                self.forget(&handle).await;
                Err(RegistryError::UnknownSession(id))
            }
            Err(e) => Err(e),
        }
    }

    /// Returns the current view of a live session.
    pub async fn snapshot(
        &self,
        session_id: SessionId,
    ) -> Result<ViewState, RegistryError> {
        let handle = self.handle(session_id).await?;
        let result = handle.snapshot().await;
        if result.is_err() {
            self.forget(&handle).await;
        }
        result
    }

    /// Whether `session_id` is live.
    pub async fn contains(&self, session_id: SessionId) -> bool {
        self.live
            .lock()
            .await
            .get(&session_id)
            .is_some_and(|h| !h.is_closed())
    }

    /// Number of live sessions.
    pub async fn live_count(&self) -> usize {
        self.live
            .lock()
            .await
            .values()
            .filter(|h| !h.is_closed())
            .count()
    }

    /// Lists the ids of all live sessions.
    pub async fn session_ids(&self) -> Vec<SessionId> {
        self.live
            .lock()
            .await
            .iter()
            .filter(|(_, h)| !h.is_closed())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Abandons every live session and empties the registry.
    ///
    /// Used on shutdown: sessions are memory-only, so a restart loses them
    /// anyway; this just lets each one publish its `Abandoned` notice.
    pub async fn shutdown_all(&self) {
        let handles: Vec<SessionHandle> =
            self.live.lock().await.drain().map(|(_, h)| h).collect();
        for handle in handles {
            // A session that ended on its own in the meantime is fine.
            let _ = handle.abandon().await;
        }
        tracing::info!("all sessions shut down");
    }

    /// Clones the handle for a live session without holding the lock
    /// across the actor round trip.
    async fn handle(
        &self,
        session_id: SessionId,
    ) -> Result<SessionHandle, RegistryError> {
        self.live
            .lock()
            .await
            .get(&session_id)
            .cloned()
            .ok_or(RegistryError::UnknownSession(session_id))
    }

    /// Removes `handle`'s entry, unless the id now belongs to a newer
    /// session.
    async fn forget(&self, handle: &SessionHandle) {
        let mut live = self.live.lock().await;
        let id = handle.session_id();
        if live.get(&id).is_some_and(|h| h.same_session(handle)) {
            live.remove(&id);
            tracing::debug!(session_id = %id, "session removed from registry");
        }
    }
}
