//! Error types for the registry layer.

use parlor_protocol::{ParticipantId, SessionId};
use parlor_session::MoveError;

/// Errors that can occur during registry operations.
///
/// All of them are reported back to the acting user; none affects other
/// sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A participant tried to challenge themselves.
    #[error("participant {0} cannot challenge themselves")]
    SelfChallenge(ParticipantId),

    /// No live session has this id: it never existed, already finished,
    /// timed out, or its actor stopped.
    #[error("session {0} not found")]
    UnknownSession(SessionId),

    /// A session with this id is already live. One challenge message maps
    /// to at most one session.
    #[error("session {0} already exists")]
    DuplicateSession(SessionId),

    /// The session rejected the move.
    #[error(transparent)]
    Move(#[from] MoveError),
}
