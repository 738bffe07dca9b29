//! Phase sequencing logic.
//!
//! Gates which resolver may run and advances the day/night counters.
//!
//! Phase flow:
//! - Setup -> Day 1 (first player added)
//! - Day N -> Night N (vote resolved first, if one is pending)
//! - Night N -> Day N+1 (night actions resolved first)
//!
//! Game over is a sticky flag that can be raised from any Day or Night.

use tracing::{info, warn};

use crate::config::RulesConfig;
use crate::event::Outcome;
use crate::resolve::day::{self, VoteResolution};
use crate::resolve::night::{self, NightReport};
use crate::resolve::rejection::Rejection;
use crate::roster::{GameState, Phase};

/// The phase that follows `phase` when nothing ends the game.
pub const fn next_phase(phase: Phase) -> Phase {
    match phase {
        Phase::Setup | Phase::Night => Phase::Day,
        Phase::Day => Phase::Night,
    }
}

/// Checks that the game is running and currently in `expected`.
pub fn require_phase(state: &GameState, expected: Phase) -> Result<(), Rejection> {
    if state.game_over {
        return Err(Rejection::GameOver);
    }
    if !state.is_started() || state.roster.is_empty() {
        return Err(Rejection::NotStarted);
    }
    if state.phase != expected {
        return Err(Rejection::WrongPhase {
            expected,
            actual: state.phase,
        });
    }
    Ok(())
}

/// Moves a Setup game to Day 1. Returns false if already started.
pub fn start_game(state: &mut GameState) -> bool {
    if state.is_started() {
        return false;
    }
    state.phase = next_phase(Phase::Setup);
    state.day_number = 1;
    state.night_number = 0;
    info!("game started");
    state.log.push(Outcome::DayStarted { day: 1 });
    true
}

/// Day -> Night. A pending vote is resolved first; if that vote ends the
/// game, the phase stays Day.
pub fn start_night(state: &mut GameState) -> Result<VoteResolution, Rejection> {
    require_phase(state, Phase::Day).inspect_err(|e| warn!(reason = %e, "start night rejected"))?;
    let night_number = state
        .night_number
        .checked_add(1)
        .ok_or(Rejection::CounterExhausted(Phase::Night))
        .inspect_err(|e| warn!(reason = %e, "start night rejected"))?;

    let resolution = day::resolve_vote(state)?;
    if state.game_over {
        return Ok(resolution);
    }

    state.night_number = night_number;
    state.pending_night.clear();
    state.phase = next_phase(Phase::Day);
    info!(night = state.night_number, "night started");
    state.log.push(Outcome::NightStarted {
        night: state.night_number,
    });
    Ok(resolution)
}

/// Night -> Day. Resolves the night; if that ends the game, the phase stays Night.
pub fn start_day(state: &mut GameState, config: &RulesConfig) -> Result<NightReport, Rejection> {
    require_phase(state, Phase::Night).inspect_err(|e| warn!(reason = %e, "start day rejected"))?;
    let day_number = state
        .day_number
        .checked_add(1)
        .ok_or(Rejection::CounterExhausted(Phase::Day))
        .inspect_err(|e| warn!(reason = %e, "start day rejected"))?;

    let report = night::resolve_night(state, config)?;
    if state.game_over {
        return Ok(report);
    }

    state.day_number = day_number;
    state.pending_vote = None;
    state.phase = next_phase(Phase::Night);
    info!(day = state.day_number, "day started");
    state.log.push(Outcome::DayStarted {
        day: state.day_number,
    });
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Player, PlayerId, Role};

    const WOLF: PlayerId = PlayerId::from_raw(1);
    const V1: PlayerId = PlayerId::from_raw(2);
    const V2: PlayerId = PlayerId::from_raw(3);
    const V3: PlayerId = PlayerId::from_raw(4);

    fn started() -> GameState {
        let mut state = GameState::new(&RulesConfig::default());
        state.roster = [
            (WOLF, Role::Werewolf),
            (V1, Role::Villager),
            (V2, Role::Villager),
            (V3, Role::Villager),
        ]
        .into_iter()
        .map(|(id, role)| Player::new(id, format!("p{}", id.raw()), role))
        .collect();
        assert!(start_game(&mut state));
        state
    }

    #[test]
    fn next_phase_cycle() {
        assert_eq!(next_phase(Phase::Setup), Phase::Day);
        assert_eq!(next_phase(Phase::Day), Phase::Night);
        assert_eq!(next_phase(Phase::Night), Phase::Day);
    }

    #[test]
    fn start_game_only_once() {
        let mut state = started();
        assert_eq!(state.phase, Phase::Day);
        assert_eq!(state.day_number, 1);
        assert_eq!(state.night_number, 0);
        assert!(!start_game(&mut state));
    }

    #[test]
    fn setup_rejects_transitions() {
        let mut state = GameState::new(&RulesConfig::default());
        assert_eq!(start_night(&mut state), Err(Rejection::NotStarted));
        assert_eq!(
            start_day(&mut state, &RulesConfig::default()),
            Err(Rejection::NotStarted)
        );
        assert_eq!(state.phase, Phase::Setup);
    }

    #[test]
    fn wrong_phase_is_rejected_without_change() {
        let mut state = started();
        let before = state.clone();
        assert_eq!(
            start_day(&mut state, &RulesConfig::default()),
            Err(Rejection::WrongPhase {
                expected: Phase::Night,
                actual: Phase::Day
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn full_cycle_advances_counters() {
        let mut state = started();
        let config = RulesConfig::default();

        assert_eq!(start_night(&mut state), Ok(VoteResolution::NoVote));
        assert_eq!(state.phase, Phase::Night);
        assert_eq!(state.night_number, 1);
        assert_eq!(state.day_number, 1);

        state.pending_night.wolf_target = Some(V1);
        let report = start_day(&mut state, &config).unwrap();
        assert_eq!(report.deaths, vec![V1]);
        assert_eq!(state.phase, Phase::Day);
        assert_eq!(state.day_number, 2);
        assert_eq!(state.night_number, 1);
    }

    #[test]
    fn start_night_clears_previous_actions() {
        let mut state = started();
        let config = RulesConfig::default();
        start_night(&mut state).unwrap();
        state.pending_night.guard_protect = Some(V2);
        start_day(&mut state, &config).unwrap();
        assert_eq!(state.pending_night.guard_protect, Some(V2));
        start_night(&mut state).unwrap();
        assert!(state.pending_night.is_empty());
    }

    #[test]
    fn start_night_resolves_pending_vote() {
        let mut state = started();
        state.pending_vote = Some(V1);
        assert_eq!(start_night(&mut state), Ok(VoteResolution::Eliminated(V1)));
        assert!(!state.roster.is_alive(V1));
        assert_eq!(state.phase, Phase::Night);
    }

    #[test]
    fn game_ending_vote_keeps_day() {
        let mut state = started();
        state.pending_vote = Some(WOLF);
        start_night(&mut state).unwrap();
        assert!(state.game_over);
        assert_eq!(state.phase, Phase::Day);
        assert_eq!(state.night_number, 0);
        assert_eq!(start_night(&mut state), Err(Rejection::GameOver));
    }

    #[test]
    fn game_ending_night_keeps_night() {
        let mut state = started();
        let config = RulesConfig::default();
        state.roster.kill(V3);
        start_night(&mut state).unwrap();
        // 1 wolf vs 2 villagers; the bite makes it 1 vs 1.
        state.pending_night.wolf_target = Some(V1);
        let report = start_day(&mut state, &config).unwrap();
        assert!(report.verdict.is_some());
        assert_eq!(state.phase, Phase::Night);
        assert_eq!(state.day_number, 1);
        assert_eq!(start_day(&mut state, &config), Err(Rejection::GameOver));
    }

    #[test]
    fn exhausted_counters_are_rejected_without_change() {
        let mut state = started();
        let config = RulesConfig::default();
        state.night_number = u32::MAX;
        state.day_number = u32::MAX;
        state.pending_vote = Some(V1);
        let before = state.clone();
        assert_eq!(
            start_night(&mut state),
            Err(Rejection::CounterExhausted(Phase::Night))
        );
        assert_eq!(state, before);

        state.phase = Phase::Night;
        state.pending_night.wolf_target = Some(V1);
        let before = state.clone();
        assert_eq!(
            start_day(&mut state, &config),
            Err(Rejection::CounterExhausted(Phase::Day))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn start_day_clears_pending_vote() {
        let mut state = started();
        let config = RulesConfig::default();
        start_night(&mut state).unwrap();
        state.pending_vote = Some(V2);
        start_day(&mut state, &config).unwrap();
        assert_eq!(state.pending_vote, None);
    }
}
