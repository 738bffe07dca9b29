//! Lycan rule engine library.
//!
//! Rules and state for a host-operated werewolf game: the roster, the night
//! action pipeline, day votes, win evaluation, and JSON snapshots for the
//! save/load layer. The [`Engine`] type is the entry point for a host UI.

pub mod config;
pub mod countdown;
pub mod engine;
pub mod event;
pub mod protocol;
pub mod resolve;
pub mod roster;

pub use config::RulesConfig;
pub use countdown::{format_mm_ss, VoteCountdown};
pub use engine::Engine;
pub use event::{EventLevel, EventLog, GameEvent, Outcome};
pub use protocol::{Snapshot, SnapshotError};
pub use resolve::{NightReport, Rejection, SeerResult, Verdict, VoteEnd, VoteResolution};
pub use roster::{Faction, GameState, NightActionKind, Phase, Player, PlayerId, Role, Roster};
