//! House-rule configuration.

use serde::{Deserialize, Serialize};

/// Tunable rule constants. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Witch heal potions available for the whole game.
    pub heal_charges: u32,
    /// Witch poison potions available for the whole game.
    pub poison_charges: u32,
    /// First night on which the gambler may bet.
    pub gambler_first_night: u32,
    /// Default vote countdown length (seconds).
    pub vote_duration_secs: u64,
    /// Shortest countdown the host may set (seconds).
    pub min_vote_secs: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            heal_charges: 1,
            poison_charges: 1,
            gambler_first_night: 2,
            vote_duration_secs: 60,
            min_vote_secs: 10,
        }
    }
}

impl RulesConfig {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
