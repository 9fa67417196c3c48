//! Read-only snapshots of a match.

use serde::{Deserialize, Serialize};

use crate::{Cell, ParticipantId, Position, Seat, Variant};

/// Where a match stands.
///
/// ```text
/// InProgress ──→ WonBy(p) | Drawn | Abandoned
/// ```
///
/// Every state except `InProgress` is terminal: no transition leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    WonBy(ParticipantId),
    Drawn,
    Abandoned,
}

impl GameStatus {
    /// Returns `true` once the match can no longer accept moves.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// The winner, if the match was won.
    pub fn winner(&self) -> Option<ParticipantId> {
        match self {
            Self::WonBy(p) => Some(*p),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "InProgress"),
            Self::WonBy(p) => write!(f, "WonBy({p})"),
            Self::Drawn => write!(f, "Drawn"),
            Self::Abandoned => write!(f, "Abandoned"),
        }
    }
}

/// Everything the presentation layer needs to draw a match.
///
/// A `ViewState` is a copy, not a reference: holding one never blocks the
/// session that produced it, and mutating one changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub variant: Variant,
    /// `[challenger, opponent]`.
    pub participants: [ParticipantId; 2],
    /// The seat whose move is next. Meaningless once `status` is terminal.
    pub to_move: Seat,
    pub status: GameStatus,
    /// Board contents, top row first.
    pub board: Vec<Vec<Cell>>,
    /// Where the most recent accepted piece landed.
    pub last_move: Option<Position>,
    /// Number of accepted moves so far.
    pub moves: u32,
}

impl ViewState {
    /// The participant sitting in `seat`.
    pub fn participant(&self, seat: Seat) -> ParticipantId {
        self.participants[seat.index()]
    }

    /// The participant whose move is next.
    pub fn current_participant(&self) -> ParticipantId {
        self.participant(self.to_move)
    }

    /// Returns `true` once the match can no longer accept moves.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The cell at `(row, col)`, or `None` if out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        self.board.get(row).and_then(|r| r.get(col)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ViewState {
        ViewState {
            variant: Variant::TicTacToe,
            participants: [ParticipantId(1), ParticipantId(2)],
            to_move: Seat::Opponent,
            status: GameStatus::InProgress,
            board: vec![vec![Cell::Empty; 3]; 3],
            last_move: None,
            moves: 0,
        }
    }

    #[test]
    fn test_status_is_terminal() {
        assert!(!GameStatus::InProgress.is_terminal());
        assert!(GameStatus::WonBy(ParticipantId(1)).is_terminal());
        assert!(GameStatus::Drawn.is_terminal());
        assert!(GameStatus::Abandoned.is_terminal());
    }

    #[test]
    fn test_status_winner_only_for_won() {
        assert_eq!(
            GameStatus::WonBy(ParticipantId(3)).winner(),
            Some(ParticipantId(3))
        );
        assert_eq!(GameStatus::Drawn.winner(), None);
    }

    #[test]
    fn test_view_current_participant_follows_seat() {
        let view = sample();
        assert_eq!(view.current_participant(), ParticipantId(2));
        assert_eq!(view.participant(Seat::Challenger), ParticipantId(1));
    }

    #[test]
    fn test_view_cell_out_of_range_is_none() {
        let view = sample();
        assert_eq!(view.cell(0, 0), Some(Cell::Empty));
        assert_eq!(view.cell(3, 0), None);
        assert_eq!(view.cell(0, 3), None);
    }
}
