//! Game state representation.
//!
//! Holds everything the engine knows at a point in time: the roster, the
//! phase and its counters, pending host input, the constraint and resource
//! trackers, the verdict, and the event log.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::action::NightActionSet;
use super::player::{PlayerId, Roster};
use crate::config::RulesConfig;
use crate::event::EventLog;
use crate::resolve::tracker::{ConstraintTracker, ResourcePool};
use crate::resolve::win::Verdict;

/// The phase of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No players yet.
    Setup,
    Day,
    Night,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Setup => "setup",
            Phase::Day => "day",
            Phase::Night => "night",
        })
    }
}

/// Complete game state.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub phase: Phase,
    /// Becomes 1 when the first player is added.
    pub day_number: u32,
    pub night_number: u32,
    /// Sticky. Once set, nothing alive/role/counter related may change.
    pub game_over: bool,
    pub winner: Option<Verdict>,
    pub roster: Roster,
    pub pending_night: NightActionSet,
    pub pending_vote: Option<PlayerId>,
    pub constraints: ConstraintTracker,
    pub resources: ResourcePool,
    pub log: EventLog,
}

impl GameState {
    /// Creates a fresh state in Setup with charges taken from `config`.
    pub fn new(config: &RulesConfig) -> Self {
        GameState {
            phase: Phase::Setup,
            day_number: 0,
            night_number: 0,
            game_over: false,
            winner: None,
            roster: Roster::new(),
            pending_night: NightActionSet::default(),
            pending_vote: None,
            constraints: ConstraintTracker::default(),
            resources: ResourcePool::new(config.heal_charges, config.poison_charges),
            log: EventLog::new(),
        }
    }

    pub fn is_started(&self) -> bool {
        self.phase != Phase::Setup
    }

    /// The announcement for the verdict, if the game has ended.
    pub fn winner_text(&self) -> Option<&'static str> {
        self.winner.map(|v| v.winner_text())
    }
}
