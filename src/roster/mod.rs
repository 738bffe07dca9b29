//! Roster and game-state types.
//!
//! Contains the core data structures for roles, players, night action
//! slots, and the overall game state.

pub mod action;
pub mod player;
pub mod role;
pub mod state;

pub use action::{NightActionKind, NightActionSet, ALL_NIGHT_ACTIONS};
pub use player::{Player, PlayerId, Roster};
pub use role::{BiteRule, Faction, Role, VoteRule, ALL_ROLES};
pub use state::{GameState, Phase};
