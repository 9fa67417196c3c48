//! The game session state machine.

use parlor_board::Board;
use parlor_protocol::{
    GameStatus, ParticipantId, Position, Seat, Target, Variant, ViewState,
};

use crate::MoveError;

/// The result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Where the piece landed.
    pub position: Position,
    /// The match after the move.
    pub view: ViewState,
    /// Set only on the move that wins the match: the participant to reward.
    ///
    /// Because a won session rejects every later move, at most one outcome
    /// per session ever carries a winner.
    pub winner: Option<ParticipantId>,
}

/// One two-player match.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ submit_move() … ──→ WonBy / Drawn
///   │
///   └──→ abandon() ──→ Abandoned
/// ```
///
/// The challenger sits in [`Seat::Challenger`], moves first, and plays
/// `PlayerOne`. After every accepted non-terminal move the turn passes to
/// the other seat. Once the status is terminal the board is frozen.
#[derive(Debug, Clone)]
pub struct GameSession {
    variant: Variant,
    participants: [ParticipantId; 2],
    board: Board,
    to_move: Seat,
    status: GameStatus,
    last_move: Option<Position>,
    moves: u32,
}

impl GameSession {
    /// Starts a new match with an empty board.
    ///
    /// Rejecting a self-challenge is the registry's job; this constructor
    /// accepts any pair.
    pub fn new(
        variant: Variant,
        challenger: ParticipantId,
        opponent: ParticipantId,
    ) -> Self {
        Self {
            variant,
            participants: [challenger, opponent],
            board: Board::for_variant(variant),
            to_move: Seat::Challenger,
            status: GameStatus::InProgress,
            last_move: None,
            moves: 0,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn to_move(&self) -> Seat {
        self.to_move
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// `[challenger, opponent]`.
    pub fn participants(&self) -> [ParticipantId; 2] {
        self.participants
    }

    /// The participant sitting in `seat`.
    pub fn participant(&self, seat: Seat) -> ParticipantId {
        self.participants[seat.index()]
    }

    /// Number of accepted moves so far.
    pub fn move_count(&self) -> u32 {
        self.moves
    }

    /// Validates and applies a move by `actor`.
    ///
    /// Checks run in this order, and the first failure wins:
    ///
    /// 1. `actor` must be the participant whose turn it is
    ///    ([`MoveError::NotYourTurn`]).
    /// 2. The match must still be in progress
    ///    ([`MoveError::GameAlreadyOver`]).
    /// 3. The board must accept the placement
    ///    ([`MoveError::IllegalMove`]).
    ///
    /// A rejected move leaves every field untouched, so repeating it yields
    /// the same error. An accepted move either ends the match (a line for
    /// the mover, or a full board) or passes the turn.
    pub fn submit_move(
        &mut self,
        actor: ParticipantId,
        target: Target,
    ) -> Result<MoveOutcome, MoveError> {
        if self.participant(self.to_move) != actor {
            return Err(MoveError::NotYourTurn(actor));
        }
        if self.status.is_terminal() {
            return Err(MoveError::GameAlreadyOver(self.status));
        }

        let seat = self.to_move;
        let position = self.board.place(target, seat.piece())?;
        self.last_move = Some(position);
        self.moves += 1;

        let mut winner = None;
        if self.board.has_line(seat.piece(), self.variant.run_length()) {
            self.status = GameStatus::WonBy(actor);
            winner = Some(actor);
        } else if self.board.is_full() {
            self.status = GameStatus::Drawn;
        } else {
            self.to_move = seat.other();
        }

        tracing::trace!(
            %actor,
            %position,
            status = %self.status,
            "move applied"
        );

        Ok(MoveOutcome {
            position,
            view: self.view(),
            winner,
        })
    }

    /// Ends an in-progress match without a result.
    ///
    /// Returns `true` if the status changed. On a terminal match this is a
    /// no-op that returns `false`: a finished result is never overwritten.
    pub fn abandon(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = GameStatus::Abandoned;
        true
    }

    /// A snapshot of the match for rendering.
    pub fn view(&self) -> ViewState {
        ViewState {
            variant: self.variant,
            participants: self.participants,
            to_move: self.to_move,
            status: self.status,
            board: self.board.to_rows(),
            last_move: self.last_move,
            moves: self.moves,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
