//! Unified error type for Parlor.

use parlor_protocol::ProtocolError;
use parlor_registry::RegistryError;

use crate::command::CommandError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `parlor` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. Move and board
/// errors arrive nested inside [`RegistryError::Move`].
#[derive(Debug, thiserror::Error)]
pub enum ParlorError {
    /// A control id or payload couldn't be parsed or encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A chat command couldn't be understood.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The registry refused the request (self-challenge, unknown session,
    /// or a rejected move).
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_protocol::{ParticipantId, SessionId};
    use parlor_session::MoveError;

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let parlor_err: ParlorError = err.into();
        assert!(matches!(parlor_err, ParlorError::Protocol(_)));
        assert!(parlor_err.to_string().contains("bad"));
    }

    #[test]
    fn test_from_command_error() {
        let parlor_err: ParlorError = CommandError::UnknownGame("chess".into()).into();
        assert!(matches!(parlor_err, ParlorError::Command(_)));
        assert!(parlor_err.to_string().contains("chess"));
    }

    #[test]
    fn test_from_registry_error() {
        let parlor_err: ParlorError =
            RegistryError::UnknownSession(SessionId(3)).into();
        assert!(matches!(parlor_err, ParlorError::Registry(_)));
    }

    #[test]
    fn test_move_error_reaches_parlor_error_through_registry() {
        let err = RegistryError::from(MoveError::NotYourTurn(ParticipantId(2)));
        let parlor_err: ParlorError = err.into();
        assert!(matches!(
            parlor_err,
            ParlorError::Registry(RegistryError::Move(MoveError::NotYourTurn(_)))
        ));
    }
}
