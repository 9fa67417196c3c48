//! Shared vocabulary for Parlor.
//!
//! Every other crate in the workspace speaks in these types:
//!
//! - **Identities** ([`ParticipantId`], [`SessionId`]): opaque handles for
//!   platform users and live matches.
//! - **Game shape** ([`Variant`], [`Target`], [`Position`], [`Piece`],
//!   [`Cell`], [`Seat`]): what a board looks like and how a move is aimed.
//! - **Snapshots** ([`ViewState`], [`GameStatus`]): the read-only picture
//!   of a match that the presentation layer renders.
//! - **Controls** ([`MoveIntent`]): the compact id carried by a UI button.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): turning views into bytes
//!   for whatever gateway delivers them.
//!
//! Nothing here owns state or does I/O.
//!
//! ```text
//! Board → Session → Registry → Presentation
//!   ╰──────── all share parlor-protocol ────────╯
//! ```

mod codec;
mod error;
mod types;
mod view;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Cell, MoveIntent, ParticipantId, Piece, Position, Seat, SessionId,
    Target, Variant,
};
pub use view::{GameStatus, ViewState};
