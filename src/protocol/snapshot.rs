//! Save/load snapshots.
//!
//! A snapshot is a flat copy of the game state that the persistence layer
//! stores as JSON. Loading validates the structure before anything is
//! replaced, so a corrupt save never damages the running game.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::event::{EventLog, GameEvent};
use crate::resolve::tracker::{ConstraintTracker, ResourcePool};
use crate::resolve::win::Verdict;
use crate::roster::{GameState, NightActionSet, Phase, Player, PlayerId, Role, Roster};

/// Errors that can occur when loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate player id {0}")]
    DuplicatePlayer(PlayerId),

    #[error("reference to unknown player {0}")]
    UnknownReference(PlayerId),

    #[error("{phase} phase with day {day} and night {night}")]
    CounterMismatch { phase: Phase, day: u32, night: u32 },

    #[error("setup phase must have no players")]
    PlayersInSetup,

    #[error("{0} phase with an empty roster")]
    EmptyRoster(Phase),

    #[error("game_over and winner disagree")]
    WinnerMismatch,

    #[error("setup phase cannot be game over")]
    GameOverInSetup,

    #[error("player {0} has a spent one-shot survival but is not a Prince")]
    InvalidSpecialFlag(PlayerId),
}

/// Flat, serializable copy of a [`GameState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub day_number: u32,
    pub night_number: u32,
    pub game_over: bool,
    pub winner: Option<Verdict>,
    pub players: Vec<Player>,
    pub night_actions: NightActionSet,
    pub day_vote: Option<PlayerId>,
    pub constraints: ConstraintTracker,
    pub resources: ResourcePool,
    pub log: Vec<GameEvent>,
}

impl Snapshot {
    /// Copies the current state.
    pub fn capture(state: &GameState) -> Self {
        Snapshot {
            phase: state.phase,
            day_number: state.day_number,
            night_number: state.night_number,
            game_over: state.game_over,
            winner: state.winner,
            players: state.roster.iter().cloned().collect(),
            night_actions: state.pending_night,
            day_vote: state.pending_vote,
            constraints: state.constraints,
            resources: state.resources,
            log: state.log.iter().cloned().collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Checks structural consistency.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut ids = HashSet::with_capacity(self.players.len());
        for p in &self.players {
            if !ids.insert(p.id) {
                return Err(SnapshotError::DuplicatePlayer(p.id));
            }
            if p.special_used && p.role != Role::Prince {
                return Err(SnapshotError::InvalidSpecialFlag(p.id));
            }
        }

        let counters_ok = match self.phase {
            Phase::Setup => self.day_number == 0 && self.night_number == 0,
            Phase::Day => self.night_number.checked_add(1) == Some(self.day_number),
            Phase::Night => self.night_number >= 1 && self.day_number == self.night_number,
        };
        if !counters_ok {
            return Err(SnapshotError::CounterMismatch {
                phase: self.phase,
                day: self.day_number,
                night: self.night_number,
            });
        }
        match self.phase {
            Phase::Setup if !self.players.is_empty() => return Err(SnapshotError::PlayersInSetup),
            Phase::Day | Phase::Night if self.players.is_empty() => {
                return Err(SnapshotError::EmptyRoster(self.phase))
            }
            _ => {}
        }
        if self.game_over != self.winner.is_some() {
            return Err(SnapshotError::WinnerMismatch);
        }
        if self.phase == Phase::Setup && self.game_over {
            return Err(SnapshotError::GameOverInSetup);
        }

        let references = self
            .night_actions
            .filled()
            .map(|(_, id)| id)
            .chain(self.day_vote)
            .chain(self.constraints.last_guard_protect)
            .chain(self.constraints.last_sorcerer_mute);
        for id in references {
            if !ids.contains(&id) {
                return Err(SnapshotError::UnknownReference(id));
            }
        }
        Ok(())
    }

    /// Validates and rebuilds the game state.
    pub fn into_state(self) -> Result<GameState, SnapshotError> {
        self.validate()?;
        Ok(GameState {
            phase: self.phase,
            day_number: self.day_number,
            night_number: self.night_number,
            game_over: self.game_over,
            winner: self.winner,
            roster: self.players.into_iter().collect::<Roster>(),
            pending_night: self.night_actions,
            pending_vote: self.day_vote,
            constraints: self.constraints,
            resources: self.resources,
            log: EventLog::from_events(self.log),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::resolve::phase::start_game;

    fn running() -> GameState {
        let mut state = GameState::new(&RulesConfig::default());
        state.roster = [
            Player::new(PlayerId::from_raw(1), "Wolf", Role::Werewolf),
            Player::new(PlayerId::from_raw(2), "Prince", Role::Prince),
            Player::new(PlayerId::from_raw(3), "Ann", Role::Villager),
        ]
        .into_iter()
        .collect();
        start_game(&mut state);
        state
    }

    #[test]
    fn capture_then_restore_is_identical() {
        let mut state = running();
        state.pending_vote = Some(PlayerId::from_raw(3));
        state.constraints.record_guard_choice(PlayerId::from_raw(2));
        let json = Snapshot::capture(&state).to_json().unwrap();
        let restored = Snapshot::from_json(&json).unwrap().into_state().unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(
            Snapshot::from_json("{not json"),
            Err(SnapshotError::Json(_))
        ));
        assert!(matches!(
            Snapshot::from_json(r#"{"phase":"dusk"}"#),
            Err(SnapshotError::Json(_))
        ));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut snap = Snapshot::capture(&running());
        let dup = snap.players[0].clone();
        snap.players.push(dup);
        assert!(matches!(
            snap.into_state(),
            Err(SnapshotError::DuplicatePlayer(id)) if id == PlayerId::from_raw(1)
        ));
    }

    #[test]
    fn dangling_reference_rejected() {
        let mut snap = Snapshot::capture(&running());
        snap.day_vote = Some(PlayerId::from_raw(42));
        assert!(matches!(
            snap.validate(),
            Err(SnapshotError::UnknownReference(_))
        ));
    }

    #[test]
    fn counters_must_match_phase() {
        let mut snap = Snapshot::capture(&running());
        snap.phase = Phase::Night;
        assert!(matches!(
            snap.validate(),
            Err(SnapshotError::CounterMismatch { phase: Phase::Night, day: 1, night: 0 })
        ));
    }

    #[test]
    fn day_counter_at_max_is_rejected() {
        let mut snap = Snapshot::capture(&running());
        snap.day_number = 1;
        snap.night_number = u32::MAX;
        assert!(matches!(
            snap.validate(),
            Err(SnapshotError::CounterMismatch { phase: Phase::Day, day: 1, night: u32::MAX })
        ));
    }

    #[test]
    fn setup_cannot_be_over() {
        let mut snap = Snapshot::capture(&GameState::new(&RulesConfig::default()));
        snap.game_over = true;
        snap.winner = Some(Verdict::WerewolvesWin);
        assert!(matches!(snap.validate(), Err(SnapshotError::GameOverInSetup)));
    }

    #[test]
    fn winner_flag_must_agree() {
        let mut snap = Snapshot::capture(&running());
        snap.game_over = true;
        assert!(matches!(snap.validate(), Err(SnapshotError::WinnerMismatch)));
    }

    #[test]
    fn special_flag_only_for_prince() {
        let mut snap = Snapshot::capture(&running());
        snap.players[2].special_used = true;
        assert!(matches!(
            snap.validate(),
            Err(SnapshotError::InvalidSpecialFlag(_))
        ));
    }

    #[test]
    fn empty_setup_is_valid() {
        let snap = Snapshot::capture(&GameState::new(&RulesConfig::default()));
        assert!(snap.validate().is_ok());
    }
}
