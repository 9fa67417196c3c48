//! Board model for Parlor's two-player grid games.
//!
//! A [`Board`] is a fixed `rows × cols` grid of [`Cell`]s with three
//! operations:
//!
//! - [`Board::place`]: put a piece on the board (gravity drop or explicit
//!   cell, depending on the variant)
//! - [`Board::has_line`]: is there a run of `n` same-piece cells in any
//!   direction?
//! - [`Board::is_full`]: the draw condition
//!
//! There is no I/O and no locking here. The board belongs to exactly one
//! game session, which is the only thing that mutates it.
//!
//! [`Cell`]: parlor_protocol::Cell

mod board;
mod error;
mod line;

pub use board::Board;
pub use error::BoardError;
pub use line::{Direction, Line};
