//! Phase resolution.
//!
//! Resolves a night's action set or a day's vote into deaths, reveals, and
//! transformations, tracks consumable and no-repeat constraints, and decides
//! when the game is over.

pub mod day;
pub mod night;
pub mod phase;
pub mod rejection;
pub mod tracker;
pub mod win;

pub use day::{resolve_vote, VoteEnd, VoteResolution};
pub use night::{
    resolve_night, seer_check, NightContext, NightReport, NightStep, SeerResult, NIGHT_PIPELINE,
};
pub use phase::{next_phase, start_day, start_game, start_night};
pub use rejection::Rejection;
pub use tracker::{ConstraintTracker, ResourcePool};
pub use win::{check_win, evaluate, VillageReason, Verdict};
