//! The economy hook.
//!
//! Parlor doesn't keep balances. When a match is won, the registry calls
//! [`Ledger::credit`] once for the winner and moves on; persisting the
//! coins is the ledger's business.

use std::future::Future;

use parlor_protocol::ParticipantId;

/// Receives reward credits for won matches.
///
/// The call is fire-and-forget: the registry spawns it and never waits
/// for it, so a slow ledger cannot stall a session.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use std::sync::Mutex;
///
/// use parlor_protocol::ParticipantId;
/// use parlor_registry::Ledger;
///
/// /// Keeps balances in memory. Fine for a demo.
/// #[derive(Default)]
/// struct MemoryLedger {
///     balances: Mutex<HashMap<ParticipantId, i64>>,
/// }
///
/// impl Ledger for MemoryLedger {
///     async fn credit(&self, participant: ParticipantId, amount: i64) {
///         if let Ok(mut balances) = self.balances.lock() {
///             *balances.entry(participant).or_default() += amount;
///         }
///     }
/// }
/// ```
pub trait Ledger: Send + Sync + 'static {
    /// Adds `amount` coins to `participant`'s balance.
    fn credit(
        &self,
        participant: ParticipantId,
        amount: i64,
    ) -> impl Future<Output = ()> + Send;
}
