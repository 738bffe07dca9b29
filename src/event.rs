//! Outcome events.
//!
//! Every narrated effect is appended to an [`EventLog`] together with a
//! timestamp and a severity level. The log is append-only for callers; the
//! external log viewer renders it with the `Display` text of each outcome.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resolve::day::VoteEnd;
use crate::resolve::win::Verdict;
use crate::roster::{NightActionKind, PlayerId, Role};

/// Severity used by the log viewer for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLevel {
    Info,
    Ok,
    Warn,
    Bad,
}

/// Everything the engine can report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    PlayerAdded { player: PlayerId, name: String, role: Role },
    DayStarted { day: u32 },
    NightStarted { night: u32 },
    /// A guard or mute repeated last night's target and was dropped.
    ConstraintViolation { kind: NightActionKind, player: PlayerId, name: String },
    Muted { player: PlayerId, name: String, day: u32 },
    HealUnavailable,
    PoisonUnavailable,
    HealUsed { player: PlayerId, name: String },
    PoisonUsed { player: PlayerId, name: String },
    /// The heal named someone other than tonight's bite victim.
    HealIgnored { player: PlayerId, name: String },
    /// A night action whose target or actor was gone when it resolved.
    ActionIgnored { kind: NightActionKind, player: PlayerId, name: String },
    GamblerWon { player: PlayerId, name: String },
    GamblerLost { player: PlayerId, name: String },
    NoVictim,
    Protected { player: PlayerId, name: String },
    BiteHealed { player: PlayerId, name: String },
    Transformed { player: PlayerId, name: String },
    Bitten { player: PlayerId, name: String },
    PoisonKill { player: PlayerId, name: String },
    SeerReveal { player: PlayerId, name: String, werewolf: bool },
    VoteEnded { how: VoteEnd },
    NoVote,
    InvalidVote { player: PlayerId },
    PrinceRevealed { player: PlayerId, name: String },
    Lynched { player: PlayerId, name: String },
    AlphaWolfLynched { player: PlayerId, name: String },
    GameOver { verdict: Verdict },
    SnapshotLoaded,
}

impl Outcome {
    pub const fn level(&self) -> EventLevel {
        match self {
            Outcome::PlayerAdded { .. }
            | Outcome::DayStarted { .. }
            | Outcome::HealUsed { .. }
            | Outcome::Protected { .. }
            | Outcome::BiteHealed { .. }
            | Outcome::SnapshotLoaded => EventLevel::Ok,
            Outcome::NightStarted { .. }
            | Outcome::ConstraintViolation { .. }
            | Outcome::Muted { .. }
            | Outcome::HealUnavailable
            | Outcome::PoisonUnavailable
            | Outcome::HealIgnored { .. }
            | Outcome::ActionIgnored { .. }
            | Outcome::NoVictim
            | Outcome::Transformed { .. }
            | Outcome::VoteEnded { .. }
            | Outcome::NoVote
            | Outcome::InvalidVote { .. }
            | Outcome::PrinceRevealed { .. } => EventLevel::Warn,
            Outcome::PoisonUsed { .. }
            | Outcome::GamblerWon { .. }
            | Outcome::GamblerLost { .. }
            | Outcome::Bitten { .. }
            | Outcome::PoisonKill { .. }
            | Outcome::Lynched { .. }
            | Outcome::AlphaWolfLynched { .. } => EventLevel::Bad,
            Outcome::SeerReveal { .. } => EventLevel::Info,
            Outcome::GameOver { verdict } => match verdict {
                Verdict::VillagersWin { .. } => EventLevel::Ok,
                Verdict::WerewolvesWin => EventLevel::Bad,
            },
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::PlayerAdded { name, role, .. } => write!(f, "Added {name} ({role})"),
            Outcome::DayStarted { day } => write!(f, "Day {day} begins"),
            Outcome::NightStarted { night } => write!(f, "Night {night} begins"),
            Outcome::ConstraintViolation { kind, name, .. } => {
                write!(f, "{kind} cannot pick {name} two nights in a row, dropped")
            }
            Outcome::Muted { name, day, .. } => write!(f, "Sorcerer mutes {name} (silent on day {day})"),
            Outcome::HealUnavailable => f.write_str("Witch has no heal potion left"),
            Outcome::PoisonUnavailable => f.write_str("Witch has no poison potion left"),
            Outcome::HealUsed { name, .. } => write!(f, "Witch uses the heal potion on {name}"),
            Outcome::PoisonUsed { name, .. } => write!(f, "Witch uses the poison potion on {name}"),
            Outcome::HealIgnored { name, .. } => {
                write!(f, "Heal on {name} ignored: not tonight's victim")
            }
            Outcome::ActionIgnored { kind, name, .. } => write!(f, "{kind} on {name} had no effect"),
            Outcome::GamblerWon { name, .. } => write!(f, "Gambler bet right: {name} was a werewolf and dies"),
            Outcome::GamblerLost { name, .. } => write!(f, "Gambler bet wrong: {name} dies"),
            Outcome::NoVictim => f.write_str("Werewolves chose no victim"),
            Outcome::Protected { name, .. } => write!(f, "Guard protected {name}, nobody dies"),
            Outcome::BiteHealed { name, .. } => write!(f, "{name} was healed and survives"),
            Outcome::Transformed { name, .. } => write!(f, "{name} was bitten and turns into a werewolf"),
            Outcome::Bitten { name, .. } => write!(f, "Werewolves killed {name}"),
            Outcome::PoisonKill { name, .. } => write!(f, "Poison killed {name}"),
            Outcome::SeerReveal { name, werewolf, .. } => {
                if *werewolf {
                    write!(f, "Seer checks {name}: WEREWOLF")
                } else {
                    write!(f, "Seer checks {name}: not a werewolf")
                }
            }
            Outcome::VoteEnded { how } => match how {
                VoteEnd::Host => f.write_str("Vote closed"),
                VoteEnd::TimerExpired => f.write_str("Vote timer expired, vote closed"),
            },
            Outcome::NoVote => f.write_str("Nobody was voted out"),
            Outcome::InvalidVote { player } => write!(f, "Invalid vote target {player}"),
            Outcome::PrinceRevealed { name, .. } => {
                write!(f, "Vote lands on {name}: revealed as Prince and spared once")
            }
            Outcome::Lynched { name, .. } => write!(f, "{name} was voted out"),
            Outcome::AlphaWolfLynched { name, .. } => write!(f, "{name} was voted out and was the Alpha Wolf"),
            Outcome::GameOver { verdict } => write!(f, "Game over: {}", verdict.winner_text()),
            Outcome::SnapshotLoaded => f.write_str("Saved game loaded"),
        }
    }
}

/// One log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub at: DateTime<Utc>,
    pub level: EventLevel,
    pub outcome: Outcome,
}

/// Append-only sequence of events, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog { events: Vec::new() }
    }

    /// Appends an outcome stamped with the current time.
    pub fn push(&mut self, outcome: Outcome) {
        self.events.push(GameEvent {
            at: Utc::now(),
            level: outcome.level(),
            outcome,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn latest(&self) -> Option<&GameEvent> {
        self.events.last()
    }

    /// Drops every event. Only the host's explicit "clear log" does this.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub(crate) fn from_events(events: Vec<GameEvent>) -> Self {
        EventLog { events }
    }
}
