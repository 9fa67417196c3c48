//! Cancellable inactivity timers for Parlor.
//!
//! An [`InactivityTimer`] answers one question: "has nothing happened for
//! `window`?" It is armed on creation, pushed back with
//! [`reset`](InactivityTimer::reset) whenever activity happens, and
//! disarmed for good with [`cancel`](InactivityTimer::cancel).
//!
//! # Integration
//!
//! The timer is designed to sit inside an actor's `tokio::select!` loop,
//! next to the command channel:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         biased;
//!         Some(cmd) = cmd_rx.recv() => {
//!             /* handle command, then timer.reset() or timer.cancel() */
//!         }
//!         expiry = timer.expired() => {
//!             /* tear the session down */
//!         }
//!     }
//! }
//! ```
//!
//! When disarmed, [`InactivityTimer::expired`] pends forever, so the
//! `select!` simply never takes that branch.
//!
//! The same pattern serves every idle window in the bot; see
//! [`TimeoutProfile`] for the stock durations.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant};
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Stock idle windows for the kinds of interactive prompts the bot runs.
///
/// Only the game window drives a Parlor session; the others share the same
/// timer pattern for the help menu and support tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeoutProfile {
    /// A two-player match: 60 seconds between accepted moves.
    Game,
    /// The interactive help menu: 15 seconds to pick a category.
    HelpPrompt,
    /// A support ticket channel: one hour without a close request.
    SupportTicket,
}

impl TimeoutProfile {
    /// The idle window for this profile.
    pub fn window(self) -> Duration {
        match self {
            Self::Game => Duration::from_secs(60),
            Self::HelpPrompt => Duration::from_secs(15),
            Self::SupportTicket => Duration::from_secs(3600),
        }
    }
}

/// Configuration for an [`InactivityTimer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// How long without activity before the timer fires.
    pub window: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::for_profile(TimeoutProfile::Game)
    }
}

impl TimerConfig {
    /// Config with the stock window for `profile`.
    pub fn for_profile(profile: TimeoutProfile) -> Self {
        Self {
            window: profile.window(),
        }
    }
}

// ---------------------------------------------------------------------------
// Expiry
// ---------------------------------------------------------------------------

/// Returned by [`InactivityTimer::expired`] when the window elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    /// The window that elapsed with no activity.
    pub idle_for: Duration,
    /// How many times the timer had been reset before it fired.
    pub resets: u64,
}

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

/// A single-shot, resettable, cancellable idle timer.
///
/// Uses Tokio's clock, so tests can drive it with `tokio::time::pause()`.
#[derive(Debug)]
pub struct InactivityTimer {
    window: Duration,
    /// `None` once cancelled or fired.
    deadline: Option<Instant>,
    resets: u64,
}

impl InactivityTimer {
    /// Creates a timer armed to fire `config.window` from now.
    ///
    /// A window too large to represent as a deadline leaves the timer
    /// disarmed: it never fires.
    pub fn new(config: TimerConfig) -> Self {
        let deadline = Instant::now().checked_add(config.window);
        debug!(
            window_secs = config.window.as_secs_f64(),
            armed = deadline.is_some(),
            "inactivity timer created"
        );
        Self {
            window: config.window,
            deadline,
            resets: 0,
        }
    }

    /// Creates a timer for a stock profile.
    pub fn for_profile(profile: TimeoutProfile) -> Self {
        Self::new(TimerConfig::for_profile(profile))
    }

    /// Pushes the deadline back to `window` from now.
    ///
    /// Has no effect on a cancelled or fired timer: once disarmed, a timer
    /// stays disarmed.
    pub fn reset(&mut self) {
        if self.deadline.is_some() {
            self.deadline = Instant::now().checked_add(self.window);
            self.resets += 1;
            trace!(resets = self.resets, "inactivity timer reset");
        }
    }

    /// Disarms the timer. [`expired`](Self::expired) will pend forever.
    ///
    /// Idempotent.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            trace!("inactivity timer cancelled");
        }
    }

    /// Whether the timer can still fire.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left before the timer fires, or `None` if disarmed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// The configured idle window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// How many times [`reset`](Self::reset) took effect.
    pub fn reset_count(&self) -> u64 {
        self.resets
    }

    /// Waits until the window elapses with no reset, then disarms.
    ///
    /// Pends forever if the timer is disarmed. Dropping this future before
    /// it completes (e.g. because another `select!` branch won) leaves the
    /// timer armed with its current deadline.
    pub async fn expired(&mut self) -> Expiry {
        let Some(deadline) = self.deadline else {
            std::future::pending::<()>().await;
            unreachable!()
        };

        time::sleep_until(deadline).await;

        self.deadline = None;
        debug!(resets = self.resets, "inactivity timer fired");
        Expiry {
            idle_for: self.window,
            resets: self.resets,
        }
    }
}
