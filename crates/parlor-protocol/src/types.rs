//! Core value types shared by every Parlor crate.
//!
//! These are small `Copy` types with no behavior beyond formatting and
//! parsing. Game rules live in `parlor-board` and `parlor-session`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// An opaque platform-user identifier.
///
/// The engine never looks inside it; resolving a display name is the
/// presentation layer's job. `#[serde(transparent)]` keeps it a bare
/// number on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// Identifies one live match in the registry.
///
/// Usually the id of the chat message that carried the challenge, so a
/// challenge maps to at most one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Pieces and cells
// ---------------------------------------------------------------------------

/// A piece a participant can put on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Piece {
    PlayerOne,
    PlayerTwo,
}

/// The content of one board cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
pub enum Cell {
    #[default]
    Empty,
    PlayerOne,
    PlayerTwo,
}

impl Cell {
    /// Returns `true` if no piece occupies this cell.
    pub fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the piece in this cell, if any.
    pub fn piece(self) -> Option<Piece> {
        match self {
            Self::Empty => None,
            Self::PlayerOne => Some(Piece::PlayerOne),
            Self::PlayerTwo => Some(Piece::PlayerTwo),
        }
    }
}

impl From<Piece> for Cell {
    fn from(piece: Piece) -> Self {
        match piece {
            Piece::PlayerOne => Self::PlayerOne,
            Piece::PlayerTwo => Self::PlayerTwo,
        }
    }
}

// ---------------------------------------------------------------------------
// Seats
// ---------------------------------------------------------------------------

/// One of the two chairs at the table.
///
/// The challenger always sits in the first chair, moves first, and plays
/// [`Piece::PlayerOne`]. Using an enum instead of a `0`/`1` index makes an
/// out-of-range turn marker unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    Challenger,
    Opponent,
}

impl Seat {
    /// The seat's position in a `[challenger, opponent]` pair: 0 or 1.
    pub fn index(self) -> usize {
        match self {
            Self::Challenger => 0,
            Self::Opponent => 1,
        }
    }

    /// The other seat.
    pub fn other(self) -> Self {
        match self {
            Self::Challenger => Self::Opponent,
            Self::Opponent => Self::Challenger,
        }
    }

    /// The piece this seat plays.
    pub fn piece(self) -> Piece {
        match self {
            Self::Challenger => Piece::PlayerOne,
            Self::Opponent => Piece::PlayerTwo,
        }
    }
}

// ---------------------------------------------------------------------------
// Variant
// ---------------------------------------------------------------------------

/// The supported two-player games.
///
/// A variant is pure configuration: grid extent, winning run length, and
/// whether pieces fall to the bottom of a column. The board and session
/// code paths are identical for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Four-in-a-row on a 6×7 grid with gravity.
    ConnectFour,
    /// Three-in-a-row on a 3×3 grid, any empty cell.
    TicTacToe,
}

impl Variant {
    /// Number of rows on the board.
    pub fn rows(self) -> usize {
        match self {
            Self::ConnectFour => 6,
            Self::TicTacToe => 3,
        }
    }

    /// Number of columns on the board.
    pub fn cols(self) -> usize {
        match self {
            Self::ConnectFour => 7,
            Self::TicTacToe => 3,
        }
    }

    /// How many same-piece cells in a row win the game.
    pub fn run_length(self) -> usize {
        match self {
            Self::ConnectFour => 4,
            Self::TicTacToe => 3,
        }
    }

    /// `true` if moves target a column and the piece drops to the lowest
    /// empty row.
    pub fn has_gravity(self) -> bool {
        matches!(self, Self::ConnectFour)
    }

    /// The command name used to start this game.
    pub fn command_name(self) -> &'static str {
        match self {
            Self::ConnectFour => "connect4",
            Self::TicTacToe => "tictactoe",
        }
    }

    /// Looks up a variant by command name or alias (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "connect4" | "connectfour" | "c4" => Some(Self::ConnectFour),
            "tictactoe" | "ttt" => Some(Self::TicTacToe),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFour => write!(f, "Connect4"),
            Self::TicTacToe => write!(f, "TicTacToe"),
        }
    }
}

// ---------------------------------------------------------------------------
// Targets and positions
// ---------------------------------------------------------------------------

/// Where a participant wants to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// Drop into a column (gravity variants).
    Column(usize),
    /// Claim an explicit cell (free-placement variants).
    Cell { row: usize, col: usize },
}

/// A resolved board coordinate. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ---------------------------------------------------------------------------
// MoveIntent: the id behind a UI control
// ---------------------------------------------------------------------------

/// A move request as carried by an interactive control.
///
/// Chat platforms give each button a short string id and echo it back on
/// click. [`MoveIntent`] formats to and parses from that id:
///
/// ```text
/// s42:c3      → session 42, drop in column 3
/// s42:r1c2    → session 42, claim cell (1, 2)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveIntent {
    pub session: SessionId,
    pub target: Target,
}

impl fmt::Display for MoveIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Target::Column(col) => write!(f, "s{}:c{}", self.session.0, col),
            Target::Cell { row, col } => {
                write!(f, "s{}:r{}c{}", self.session.0, row, col)
            }
        }
    }
}

impl FromStr for MoveIntent {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProtocolError::InvalidMessage(format!("bad control id {s:?}"));

        let (session, target) = s.split_once(':').ok_or_else(invalid)?;
        let session = session
            .strip_prefix('s')
            .and_then(|n| n.parse::<u64>().ok())
            .map(SessionId)
            .ok_or_else(invalid)?;

        let target = if let Some(col) = target.strip_prefix('c') {
            Target::Column(col.parse().map_err(|_| invalid())?)
        } else if let Some(rest) = target.strip_prefix('r') {
            let (row, col) = rest.split_once('c').ok_or_else(invalid)?;
            Target::Cell {
                row: row.parse().map_err(|_| invalid())?,
                col: col.parse().map_err(|_| invalid())?,
            }
        } else {
            return Err(invalid());
        };

        Ok(Self { session, target })
    }
}

// =========================================================================
// Tests
// =========================================================================
