//! Directional line scanning.
//!
//! A line is `length` consecutive cells starting at `start` and stepping by
//! one [`Direction`] delta. Every step is bounds-checked with signed
//! arithmetic, so no direction gets special-cased edge handling.

use parlor_protocol::Position;

/// The four scan directions, in scan order.
///
/// Only four are needed: scanning "west" from a cell finds the same line as
/// scanning "east" from its other end, and the board visits every start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// → along a row.
    East,
    /// ↓ down a column.
    South,
    /// ↘ down and to the right.
    SouthEast,
    /// ↙ down and to the left.
    SouthWest,
}

impl Direction {
    /// Every direction, in the order the board tries them.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// `(row, col)` step for one cell in this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Self::East => (0, 1),
            Self::South => (1, 0),
            Self::SouthEast => (1, 1),
            Self::SouthWest => (1, -1),
        }
    }
}

/// A run of same-piece cells found on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Line {
    pub start: Position,
    pub direction: Direction,
    pub length: usize,
}

impl Line {
    /// The cells covered by this line, from `start` outward.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        let (dr, dc) = self.direction.delta();
        (0..self.length).map(move |k| {
            let k = k as isize;
            // A `Line` is only constructed after `step` validated every
            // cell, so these stay in range.
            Position::new(
                (self.start.row as isize + dr * k) as usize,
                (self.start.col as isize + dc * k) as usize,
            )
        })
    }
}

/// The `k`-th cell from `start` in `direction`, or `None` if it falls off a
/// `rows × cols` grid.
pub(crate) fn step(
    start: Position,
    direction: Direction,
    k: usize,
    rows: usize,
    cols: usize,
) -> Option<Position> {
    let (dr, dc) = direction.delta();
    let k = isize::try_from(k).ok()?;
    let row = start.row as isize + dr * k;
    let col = start.col as isize + dc * k;
    if row < 0 || col < 0 {
        return None;
    }
    let (row, col) = (row as usize, col as usize);
    (row < rows && col < cols).then_some(Position::new(row, col))
}
