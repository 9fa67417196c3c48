//! Registry configuration.

use std::time::Duration;

use parlor_timer::TimeoutProfile;
use serde::{Deserialize, Serialize};

/// Configuration shared by every session the registry creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// How long a session may go without an accepted move before it is
    /// abandoned.
    pub idle_timeout: Duration,

    /// Coins credited to the winner of a match. Draws and abandoned
    /// matches credit nothing.
    pub win_reward: i64,

    /// Command channel capacity per session actor. Senders wait when the
    /// channel is full.
    pub channel_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            idle_timeout: TimeoutProfile::Game.window(),
            win_reward: 100,
            channel_size: 16,
        }
    }
}
