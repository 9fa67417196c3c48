//! # Parlor
//!
//! Turn-based two-player mini-games for chat bots.
//!
//! A challenge command opens a match between two participants; each match
//! is an isolated session that accepts moves in strict turn order, detects
//! wins and draws, credits the winner through a [`Ledger`], and abandons
//! itself after a period of inactivity. Views are rendered as emoji boards
//! with one button per legal move.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parlor::prelude::*;
//!
//! struct NoCoins;
//!
//! impl Ledger for NoCoins {
//!     async fn credit(&self, _: ParticipantId, _: i64) {}
//! }
//!
//! # async fn run() -> Result<(), ParlorError> {
//! let parlor = ParlorBuilder::new().build(NoCoins, MentionNames);
//!
//! let opening = parlor.challenge(ParticipantId(1), "$c4 <@2>").await?;
//! let first = &opening.controls[3].id;
//! let after = parlor.interact(ParticipantId(1), first).await?;
//! println!("{}", after.board.join("\n"));
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod engine;
pub mod error;
pub mod present;

pub use command::{ChallengeCommand, CommandError, COMMAND_PREFIX};
pub use engine::{Parlor, ParlorBuilder};
pub use error::ParlorError;
pub use present::{
    Control, DisplayNames, Feedback, MentionNames, Presenter, RenderedView,
};

pub use parlor_registry::Ledger;

pub mod prelude {
    pub use crate::{
        ChallengeCommand, CommandError, Control, DisplayNames, Feedback,
        MentionNames, Parlor, ParlorBuilder, ParlorError, Presenter,
        RenderedView, COMMAND_PREFIX,
    };
    pub use parlor_protocol::{
        Codec, GameStatus, JsonCodec, MoveIntent, ParticipantId, SessionId,
        Target, Variant, ViewState,
    };
    pub use parlor_registry::{
        AbandonReason, Ledger, RegistryConfig, RegistryError, SessionNotice,
        SessionRegistry,
    };
    pub use parlor_session::MoveError;
    pub use parlor_timer::TimeoutProfile;
}
