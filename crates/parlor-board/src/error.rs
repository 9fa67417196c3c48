//! Error types for board placement.

use parlor_protocol::Position;

/// Why a piece could not be placed. The board is untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Every cell in the column is already occupied.
    #[error("column {0} is full")]
    ColumnFull(usize),

    /// The requested cell already holds a piece.
    #[error("cell {0} is occupied")]
    CellOccupied(Position),

    /// The target lies outside the grid.
    #[error("target is off the board")]
    OutOfBounds,

    /// A column target on a free-placement board, or a cell target on a
    /// gravity board.
    #[error("target kind does not match this board")]
    TargetMismatch,
}
