//! Turn-based game sessions for Parlor.
//!
//! A [`GameSession`] is one two-player match: it owns the board, knows who
//! sits in which seat, tracks whose move is next, and decides when the match
//! is over. It is a plain synchronous state machine:
//!
//! ```text
//! InProgress ──(winning move)──→ WonBy(p)
//!     │
//!     ├──(board full)──→ Drawn
//!     │
//!     └──(abandon)──→ Abandoned
//! ```
//!
//! # How it fits in the stack
//!
//! ```text
//! Registry (above)  ← owns one GameSession per live match, serializes moves
//!     ↕
//! Session (this crate)  ← turn order, legality, win/draw detection
//!     ↕
//! Board (below)  ← placement and line scanning
//! ```
//!
//! Nothing here is shared between tasks. Whoever owns the `GameSession`
//! is the only writer.

mod error;
mod session;

pub use error::MoveError;
pub use session::{GameSession, MoveOutcome};
