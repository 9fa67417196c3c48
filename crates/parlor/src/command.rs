//! The challenge command surface: `$connect4 <opponent>` and friends.

use std::str::FromStr;

use parlor_protocol::{ParticipantId, Variant};

/// Prefix every chat command starts with.
pub const COMMAND_PREFIX: &str = "$";

/// Why a chat line couldn't be turned into a challenge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The line is blank or doesn't start with [`COMMAND_PREFIX`].
    #[error("not a command")]
    Empty,

    /// The command name isn't a game.
    #[error("unknown game {0:?}")]
    UnknownGame(String),

    /// The game was named but nobody was challenged.
    #[error("{0} needs an opponent")]
    MissingOpponent(Variant),

    /// The opponent is neither a numeric id nor a mention.
    #[error("invalid opponent {0:?}")]
    InvalidOpponent(String),
}

/// A parsed `$<game> <opponent>` command.
///
/// ```rust
/// use parlor::ChallengeCommand;
/// use parlor_protocol::{ParticipantId, Variant};
///
/// let cmd: ChallengeCommand = "$c4 <@!42>".parse().unwrap();
/// assert_eq!(cmd.variant, Variant::ConnectFour);
/// assert_eq!(cmd.opponent, ParticipantId(42));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeCommand {
    pub variant: Variant,
    pub opponent: ParticipantId,
}

impl FromStr for ChallengeCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let body = line
            .trim()
            .strip_prefix(COMMAND_PREFIX)
            .ok_or(CommandError::Empty)?;
        let mut words = body.split_whitespace();

        let name = words.next().ok_or(CommandError::Empty)?;
        let variant = Variant::from_name(name)
            .ok_or_else(|| CommandError::UnknownGame(name.to_string()))?;

        let raw = words.next().ok_or(CommandError::MissingOpponent(variant))?;
        let opponent = parse_participant(raw)
            .ok_or_else(|| CommandError::InvalidOpponent(raw.to_string()))?;

        Ok(Self { variant, opponent })
    }
}

/// Reads a participant from a raw id (`123`) or a mention (`<@123>`,
/// `<@!123>`).
pub fn parse_participant(raw: &str) -> Option<ParticipantId> {
    let digits = match raw.strip_prefix("<@").and_then(|r| r.strip_suffix('>')) {
        Some(inner) => inner.strip_prefix('!').unwrap_or(inner),
        None => raw,
    };
    digits.parse().ok().map(ParticipantId)
}
