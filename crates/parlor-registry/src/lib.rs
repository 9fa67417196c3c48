//! Live session registry for Parlor.
//!
//! Each live match runs as an isolated Tokio task (actor model) that owns
//! its [`GameSession`](parlor_session::GameSession) and its inactivity
//! timer. Callers never touch the session directly; they send commands
//! through the [`SessionRegistry`], and the actor applies them one at a
//! time in arrival order.
//!
//! # Key types
//!
//! - [`SessionRegistry`]: creates sessions, routes moves, owns the live map
//! - [`SessionHandle`]: sends commands to a running session actor
//! - [`Ledger`]: the economy hook credited when a match is won
//! - [`SessionNotice`]: lifecycle events for the presentation layer
//! - [`RegistryConfig`]: idle timeout, reward, channel size

mod actor;
mod config;
mod error;
mod ledger;
mod registry;

pub use actor::{AbandonReason, NoticeSender, SessionHandle, SessionNotice};
pub use config::RegistryConfig;
pub use error::RegistryError;
pub use ledger::Ledger;
pub use registry::SessionRegistry;
