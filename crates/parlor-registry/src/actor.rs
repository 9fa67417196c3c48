//! Session actor: an isolated Tokio task that owns one game session.
//!
//! Each session runs in its own task and talks to the outside world
//! through an mpsc channel. Moves from both participants land in the same
//! channel and are applied strictly one after another, so two racing
//! clicks can never interleave inside `submit_move`.

use std::collections::HashMap;
use std::sync::Arc;

use parlor_protocol::{ParticipantId, SessionId, Target, ViewState};
use parlor_session::{GameSession, MoveError};
use parlor_timer::{InactivityTimer, TimerConfig};
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::{Ledger, RegistryConfig, RegistryError};

/// A lifecycle event published by a session actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    /// An accepted move left the match in progress.
    Updated { session: SessionId, view: ViewState },
    /// An accepted move ended the match (win or draw).
    Finished { session: SessionId, view: ViewState },
    /// The match was abandoned before a result.
    Abandoned {
        session: SessionId,
        view: ViewState,
        reason: AbandonReason,
    },
}

/// Why a match was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonReason {
    /// No accepted move within the idle window.
    IdleTimeout,
    /// The registry shut the session down, or every handle to it was
    /// dropped.
    Shutdown,
}

impl SessionNotice {
    pub fn session(&self) -> SessionId {
        match self {
            Self::Updated { session, .. }
            | Self::Finished { session, .. }
            | Self::Abandoned { session, .. } => *session,
        }
    }

    pub fn view(&self) -> &ViewState {
        match self {
            Self::Updated { view, .. }
            | Self::Finished { view, .. }
            | Self::Abandoned { view, .. } => view,
        }
    }
}

/// Channel sender for delivering notices to the presentation layer.
pub type NoticeSender = mpsc::UnboundedSender<SessionNotice>;

/// The registry's map of live sessions, shared with every actor so an
/// actor can remove itself when it ends.
pub(crate) type LiveMap = Arc<Mutex<HashMap<SessionId, SessionHandle>>>;

/// Commands sent to a session actor through its channel.
///
/// The `oneshot::Sender` in each variant is a reply channel: the caller
/// sends a command and waits for the answer on it.
pub(crate) enum SessionCommand {
    /// Apply a move on behalf of `actor`.
    Move {
        actor: ParticipantId,
        target: Target,
        reply: oneshot::Sender<Result<ViewState, MoveError>>,
    },

    /// Request the current view.
    Snapshot { reply: oneshot::Sender<ViewState> },

    /// Abandon the match and stop.
    Abandon { reply: oneshot::Sender<ViewState> },
}

/// Handle to a running session actor.
///
/// Cheap to clone: it's just an `mpsc::Sender` wrapper. The registry keeps
/// one per live session.
#[derive(Clone)]
pub struct SessionHandle {
    session_id: SessionId,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// `true` once the actor has stopped and can no longer take commands.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// `true` if both handles point at the same actor.
    pub fn same_session(&self, other: &SessionHandle) -> bool {
        self.sender.same_channel(&other.sender)
    }

    /// Sends a move to the session and waits for the result.
    ///
    /// A stopped actor (finished, timed out, or crashed) reports
    /// [`RegistryError::UnknownSession`].
    pub async fn submit(
        &self,
        actor: ParticipantId,
        target: Target,
    ) -> Result<ViewState, RegistryError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Move {
                actor,
                target,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RegistryError::UnknownSession(self.session_id))?;
        let result = reply_rx
            .await
            .map_err(|_| RegistryError::UnknownSession(self.session_id))?;
        Ok(result?)
    }

    /// Requests the current view.
    pub async fn snapshot(&self) -> Result<ViewState, RegistryError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| RegistryError::UnknownSession(self.session_id))?;
        reply_rx
            .await
            .map_err(|_| RegistryError::UnknownSession(self.session_id))
    }

    /// Tells the session to abandon the match and stop.
    pub async fn abandon(&self) -> Result<ViewState, RegistryError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Abandon { reply: reply_tx })
            .await
            .map_err(|_| RegistryError::UnknownSession(self.session_id))?;
        reply_rx
            .await
            .map_err(|_| RegistryError::UnknownSession(self.session_id))
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct SessionActor<L: Ledger> {
    session_id: SessionId,
    game: GameSession,
    timer: InactivityTimer,
    win_reward: i64,
    ledger: Arc<L>,
    live: LiveMap,
    notices: NoticeSender,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl<L: Ledger> SessionActor<L> {
    /// Runs the actor loop until the match ends.
    async fn run(mut self) {
        let [challenger, opponent] = self.game.participants();
        tracing::info!(
            session_id = %self.session_id,
            variant = %self.game.variant(),
            %challenger,
            %opponent,
            "session started"
        );

        loop {
            // `biased` polls the command channel first. A move that is
            // already queued when the deadline passes still gets applied,
            // and if it ends the match the timeout never fires.
            tokio::select! {
                biased;
                cmd = self.receiver.recv() => match cmd {
                    Some(SessionCommand::Move { actor, target, reply }) => {
                        let result = self.handle_move(actor, target);
                        let _ = reply.send(result);
                        if self.game.status().is_terminal() {
                            break;
                        }
                    }
                    Some(SessionCommand::Snapshot { reply }) => {
                        let _ = reply.send(self.game.view());
                    }
                    Some(SessionCommand::Abandon { reply }) => {
                        self.abandon(AbandonReason::Shutdown);
                        let _ = reply.send(self.game.view());
                        break;
                    }
                    None => {
                        self.abandon(AbandonReason::Shutdown);
                        break;
                    }
                },
                expiry = self.timer.expired() => {
                    tracing::info!(
                        session_id = %self.session_id,
                        idle_secs = expiry.idle_for.as_secs(),
                        moves = self.game.move_count(),
                        "session idle, abandoning"
                    );
                    self.abandon(AbandonReason::IdleTimeout);
                    break;
                }
            }
        }

        self.retire().await;
        tracing::info!(
            session_id = %self.session_id,
            status = %self.game.status(),
            "session stopped"
        );
    }

    fn handle_move(
        &mut self,
        actor: ParticipantId,
        target: Target,
    ) -> Result<ViewState, MoveError> {
        let outcome = match self.game.submit_move(actor, target) {
            Ok(outcome) => outcome,
            Err(reason) => {
                tracing::debug!(
                    session_id = %self.session_id,
                    %actor,
                    %reason,
                    "move rejected"
                );
                return Err(reason);
            }
        };

        if outcome.view.is_terminal() {
            self.timer.cancel();
            tracing::info!(
                session_id = %self.session_id,
                status = %outcome.view.status,
                moves = outcome.view.moves,
                "session finished"
            );
            self.notify(SessionNotice::Finished {
                session: self.session_id,
                view: outcome.view.clone(),
            });
        } else {
            self.timer.reset();
            self.notify(SessionNotice::Updated {
                session: self.session_id,
                view: outcome.view.clone(),
            });
        }

        if let Some(winner) = outcome.winner {
            self.credit(winner);
        }

        Ok(outcome.view)
    }

    /// Abandons the match if it is still running and publishes the notice.
    fn abandon(&mut self, reason: AbandonReason) {
        self.timer.cancel();
        if self.game.abandon() {
            tracing::info!(session_id = %self.session_id, ?reason, "session abandoned");
            self.notify(SessionNotice::Abandoned {
                session: self.session_id,
                view: self.game.view(),
                reason,
            });
        }
    }

    /// Fires the reward credit without waiting for the ledger.
    fn credit(&self, winner: ParticipantId) {
        let amount = self.win_reward;
        if amount == 0 {
            return;
        }
        tracing::info!(
            session_id = %self.session_id,
            %winner,
            amount,
            "crediting win reward"
        );
        let ledger = Arc::clone(&self.ledger);
        tokio::spawn(async move {
            ledger.credit(winner, amount).await;
        });
    }

    /// Sends a notice. Silently drops it if nobody is listening.
    fn notify(&self, notice: SessionNotice) {
        let _ = self.notices.send(notice);
    }

    /// Removes this session from the registry's live map.
    ///
    /// Closing the receiver first marks our handle as closed, which is how
    /// we tell our entry apart from a newer session that reused the id.
    async fn retire(&mut self) {
        self.receiver.close();
        let mut live = self.live.lock().await;
        if live.get(&self.session_id).is_some_and(SessionHandle::is_closed) {
            live.remove(&self.session_id);
        }
    }
}

/// Spawns a new session actor and returns a handle to it.
///
/// The inactivity timer starts now.
pub(crate) fn spawn_session<L: Ledger>(
    session_id: SessionId,
    game: GameSession,
    config: &RegistryConfig,
    ledger: Arc<L>,
    live: LiveMap,
    notices: NoticeSender,
) -> SessionHandle {
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));

    let actor = SessionActor {
        session_id,
        game,
        timer: InactivityTimer::new(TimerConfig {
            window: config.idle_timeout,
        }),
        win_reward: config.win_reward,
        ledger,
        live,
        notices,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    SessionHandle {
        session_id,
        sender: tx,
    }
}
