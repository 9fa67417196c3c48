//! `Parlor` builder and facade.
//!
//! This is the entry point a chat gateway talks to. It ties together the
//! layers: command → registry → session, and back out through the
//! presenter and codec.

use std::sync::Mutex;
use std::time::Duration;

use parlor_protocol::{Codec, JsonCodec, MoveIntent, ParticipantId, SessionId};
use parlor_registry::{
    Ledger, RegistryConfig, SessionNotice, SessionRegistry,
};
use tokio::sync::mpsc;

use crate::command::ChallengeCommand;
use crate::present::{DisplayNames, Feedback, Presenter, RenderedView};
use crate::ParlorError;

/// Builder for configuring a [`Parlor`].
///
/// # Example
///
/// ```rust,ignore
/// use parlor::prelude::*;
///
/// let parlor = ParlorBuilder::new()
///     .idle_timeout(Duration::from_secs(90))
///     .build(my_ledger, MentionNames);
/// let notices = parlor.take_notices();
/// ```
pub struct ParlorBuilder {
    config: RegistryConfig,
}

impl ParlorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: RegistryConfig::default(),
        }
    }

    /// Replaces the whole registry configuration.
    pub fn registry_config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// How long a match may sit without an accepted move.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.idle_timeout = timeout;
        self
    }

    /// Coins credited to each winner.
    pub fn win_reward(mut self, amount: i64) -> Self {
        self.config.win_reward = amount;
        self
    }

    /// Builds a `Parlor` that encodes views as JSON.
    ///
    /// Must be called inside a Tokio runtime: sessions are spawned as
    /// tasks once challenges arrive.
    pub fn build<L: Ledger, D: DisplayNames>(
        self,
        ledger: L,
        names: D,
    ) -> Parlor<L, D, JsonCodec> {
        self.build_with_codec(ledger, names, JsonCodec)
    }

    /// Builds a `Parlor` with a custom codec.
    pub fn build_with_codec<L: Ledger, D: DisplayNames, C: Codec>(
        self,
        ledger: L,
        names: D,
        codec: C,
    ) -> Parlor<L, D, C> {
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let presenter = Presenter::new(names, self.config.win_reward);
        Parlor {
            registry: SessionRegistry::with_notices(self.config, ledger, notice_tx),
            presenter,
            codec,
            notices: Mutex::new(Some(notice_rx)),
        }
    }
}

impl Default for ParlorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The game engine as seen from a chat gateway.
///
/// Every method takes `&self`, so wrap it in an `Arc` and share it across
/// the tasks handling messages and button clicks.
pub struct Parlor<L: Ledger, D: DisplayNames, C: Codec = JsonCodec> {
    registry: SessionRegistry<L>,
    presenter: Presenter<D>,
    codec: C,
    notices: Mutex<Option<mpsc::UnboundedReceiver<SessionNotice>>>,
}

impl<L: Ledger, D: DisplayNames, C: Codec> Parlor<L, D, C> {
    /// Takes the receiver for session notices (moves, finishes, timeouts).
    ///
    /// Returns `None` after the first call. Notices published while nobody
    /// holds the receiver are buffered; once it is dropped they are lost.
    pub fn take_notices(&self) -> Option<mpsc::UnboundedReceiver<SessionNotice>> {
        self.notices.lock().ok()?.take()
    }

    /// Handles a `$<game> <opponent>` chat line from `author`.
    ///
    /// Returns the opening board to post.
    pub async fn challenge(
        &self,
        author: ParticipantId,
        line: &str,
    ) -> Result<RenderedView, ParlorError> {
        let cmd: ChallengeCommand = line.parse()?;
        let session = self
            .registry
            .create(author, cmd.opponent, cmd.variant)
            .await?;
        let view = self.registry.snapshot(session).await?;
        tracing::info!(
            %session,
            %author,
            opponent = %cmd.opponent,
            variant = %cmd.variant,
            "challenge accepted"
        );
        Ok(self.presenter.render(session, &view))
    }

    /// Handles a click on a control.
    ///
    /// Returns the updated board to edit into the message. On error, show
    /// [`feedback`](Self::feedback) to `actor` only; nothing changed.
    pub async fn interact(
        &self,
        actor: ParticipantId,
        control_id: &str,
    ) -> Result<RenderedView, ParlorError> {
        let intent: MoveIntent = control_id.parse()?;
        match self
            .registry
            .dispatch(intent.session, actor, intent.target)
            .await
        {
            Ok(view) => Ok(self.presenter.render(intent.session, &view)),
            Err(e) => {
                tracing::debug!(
                    session = %intent.session,
                    %actor,
                    error = %e,
                    "interaction rejected"
                );
                Err(e.into())
            }
        }
    }

    /// Renders the current board of a live session.
    pub async fn view(
        &self,
        session: SessionId,
    ) -> Result<RenderedView, ParlorError> {
        let view = self.registry.snapshot(session).await?;
        Ok(self.presenter.render(session, &view))
    }

    /// Renders the board carried by a notice.
    pub fn render_notice(&self, notice: &SessionNotice) -> RenderedView {
        self.presenter.render_notice(notice)
    }

    /// The ephemeral reply for `err`.
    pub fn feedback(&self, err: &ParlorError) -> Feedback {
        self.presenter.feedback(err)
    }

    /// Serializes a rendered view for the gateway.
    pub fn encode(&self, view: &RenderedView) -> Result<Vec<u8>, ParlorError> {
        Ok(self.codec.encode(view)?)
    }

    /// Abandons every live match. Call on shutdown.
    pub async fn shutdown(&self) {
        self.registry.shutdown_all().await;
    }

    pub fn registry(&self) -> &SessionRegistry<L> {
        &self.registry
    }

    pub fn presenter(&self) -> &Presenter<D> {
        &self.presenter
    }
}
