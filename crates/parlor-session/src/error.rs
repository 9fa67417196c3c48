//! Error types for the session layer.

use parlor_board::BoardError;
use parlor_protocol::{GameStatus, ParticipantId};

/// Why a move was rejected.
///
/// Every variant is recoverable and user-facing: the session's state is
/// exactly what it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The actor is not the participant whose move is next. This also
    /// covers actors who aren't in the match at all.
    #[error("it is not {0}'s turn")]
    NotYourTurn(ParticipantId),

    /// The match already reached a terminal status.
    #[error("game is already over ({0})")]
    GameAlreadyOver(GameStatus),

    /// The board refused the placement (full column, taken cell, or a
    /// target that isn't on this board). No turn is consumed.
    #[error("illegal move: {0}")]
    IllegalMove(#[from] BoardError),
}
