//! The grid itself.

use parlor_protocol::{Cell, Piece, Position, Target, Variant};

use crate::line::{step, Direction, Line};
use crate::BoardError;

/// A fixed-size grid of cells, stored row-major with row 0 at the top.
///
/// Cells only ever go from `Empty` to occupied. Nothing on this type can
/// clear a cell, so a placed piece stays for the life of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    gravity: bool,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board.
    ///
    /// With `gravity`, moves target a column and fall to the lowest empty
    /// row; without it, moves target an explicit cell.
    pub fn new(rows: usize, cols: usize, gravity: bool) -> Self {
        Self {
            rows,
            cols,
            gravity,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    /// Creates the empty board for a game variant.
    pub fn for_variant(variant: Variant) -> Self {
        Self::new(variant.rows(), variant.cols(), variant.has_gravity())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn has_gravity(&self) -> bool {
        self.gravity
    }

    /// The cell at `(row, col)`, or `None` if out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Board contents as nested rows, top row first.
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.cols.max(1)).map(<[Cell]>::to_vec).collect()
    }

    /// Places `piece` at `target` and returns where it landed.
    ///
    /// - [`Target::Column`] on a gravity board: the piece occupies the
    ///   bottom-most empty cell of that column. Fails with
    ///   [`BoardError::ColumnFull`] if there is none.
    /// - [`Target::Cell`] on a free board: the piece occupies exactly that
    ///   cell. Fails with [`BoardError::CellOccupied`] if it is taken.
    ///
    /// On any error the board is unchanged.
    pub fn place(
        &mut self,
        target: Target,
        piece: Piece,
    ) -> Result<Position, BoardError> {
        match (target, self.gravity) {
            (Target::Column(col), true) => self.drop_in_column(col, piece),
            (Target::Cell { row, col }, false) => self.claim(row, col, piece),
            _ => Err(BoardError::TargetMismatch),
        }
    }

    fn drop_in_column(
        &mut self,
        col: usize,
        piece: Piece,
    ) -> Result<Position, BoardError> {
        if col >= self.cols {
            return Err(BoardError::OutOfBounds);
        }
        let row = (0..self.rows)
            .rev()
            .find(|&row| self.cells[row * self.cols + col].is_empty())
            .ok_or(BoardError::ColumnFull(col))?;
        self.cells[row * self.cols + col] = piece.into();
        Ok(Position::new(row, col))
    }

    fn claim(
        &mut self,
        row: usize,
        col: usize,
        piece: Piece,
    ) -> Result<Position, BoardError> {
        let i = self.index(row, col).ok_or(BoardError::OutOfBounds)?;
        if !self.cells[i].is_empty() {
            return Err(BoardError::CellOccupied(Position::new(row, col)));
        }
        self.cells[i] = piece.into();
        Ok(Position::new(row, col))
    }

    /// Returns `true` if `piece` holds `run` consecutive cells in any
    /// direction.
    pub fn has_line(&self, piece: Piece, run: usize) -> bool {
        self.line_at(piece, run).is_some()
    }

    /// Finds the first run of `run` consecutive `piece` cells.
    ///
    /// Start cells are visited row-major, and each start tries the
    /// directions in [`Direction::ALL`] order, so the same board always
    /// yields the same line. A `run` of zero never matches.
    pub fn line_at(&self, piece: Piece, run: usize) -> Option<Line> {
        if run == 0 {
            return None;
        }
        let wanted = Cell::from(piece);

        for row in 0..self.rows {
            for col in 0..self.cols {
                let start = Position::new(row, col);
                for direction in Direction::ALL {
                    let complete = (0..run).all(|k| {
                        step(start, direction, k, self.rows, self.cols)
                            .and_then(|p| self.get(p.row, p.col))
                            == Some(wanted)
                    });
                    if complete {
                        return Some(Line {
                            start,
                            direction,
                            length: run,
                        });
                    }
                }
            }
        }
        None
    }

    /// Returns `true` when no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }
}
