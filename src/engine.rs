//! Engine state management.
//!
//! Holds the game state, the house rules, and the id generator, and exposes
//! the host-facing operations. Every operation either succeeds or returns a
//! [`Rejection`] and leaves the state untouched.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::config::RulesConfig;
use crate::event::{EventLog, Outcome};
use crate::protocol::snapshot::{Snapshot, SnapshotError};
use crate::resolve::day::{self, VoteEnd, VoteResolution};
use crate::resolve::night::{self, NightReport, SeerResult};
use crate::resolve::phase;
use crate::resolve::rejection::Rejection;
use crate::resolve::win::Verdict;
use crate::roster::{GameState, NightActionKind, Phase, Player, PlayerId, Role, Roster};

/// The rule engine for one table.
pub struct Engine {
    state: GameState,
    config: RulesConfig,
    rng: SmallRng,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    /// Creates an engine with default rules and entropy-seeded ids.
    pub fn new() -> Self {
        Engine::build(RulesConfig::default(), SmallRng::from_entropy())
    }

    pub fn with_config(config: RulesConfig) -> Self {
        Engine::build(config, SmallRng::from_entropy())
    }

    /// Creates an engine whose player ids are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Engine::build(RulesConfig::default(), SmallRng::seed_from_u64(seed))
    }

    fn build(config: RulesConfig, rng: SmallRng) -> Self {
        Engine {
            state: GameState::new(&config),
            config,
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.state.roster
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn day_number(&self) -> u32 {
        self.state.day_number
    }

    pub fn night_number(&self) -> u32 {
        self.state.night_number
    }

    pub fn alive_count(&self) -> usize {
        self.state.roster.alive_count()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.game_over
    }

    pub fn winner(&self) -> Option<Verdict> {
        self.state.winner
    }

    pub fn log(&self) -> &EventLog {
        &self.state.log
    }

    /// Empties the event log; the game itself is unaffected.
    pub fn clear_log(&mut self) {
        self.state.log.clear();
    }

    fn next_id(&mut self) -> PlayerId {
        loop {
            let id = PlayerId::from_raw(self.rng.gen());
            if !self.state.roster.contains(id) {
                return id;
            }
        }
    }

    /// Seats a player. The first player starts the game at Day 1.
    pub fn add_player(&mut self, name: &str, role: Role) -> Result<Player, Rejection> {
        if self.state.game_over {
            return Err(Rejection::GameOver);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(Rejection::BlankName);
        }

        let player = Player::new(self.next_id(), name, role);
        self.state.roster.push(player.clone());
        debug!(player = %player.id, %role, "player added");
        self.state.log.push(Outcome::PlayerAdded {
            player: player.id,
            name: player.name.clone(),
            role,
        });
        phase::start_game(&mut self.state);
        Ok(player)
    }

    /// Day -> Night, resolving any pending vote first.
    pub fn start_night(&mut self) -> Result<VoteResolution, Rejection> {
        phase::start_night(&mut self.state)
    }

    /// Night -> Day, resolving the night's actions first.
    pub fn start_day(&mut self) -> Result<NightReport, Rejection> {
        phase::start_day(&mut self.state, &self.config)
    }

    fn living_target(&self, id: PlayerId) -> Result<&Player, Rejection> {
        let player = self
            .state
            .roster
            .get(id)
            .ok_or(Rejection::UnknownPlayer(id))?;
        if !player.alive {
            return Err(Rejection::TargetDead {
                player: id,
                name: player.name.clone(),
            });
        }
        Ok(player)
    }

    fn actor_alive(&self, kind: NightActionKind) -> bool {
        match kind {
            NightActionKind::WolfTarget => self.state.roster.any_werewolf_alive(),
            _ => self.state.roster.is_role_alive(kind.actor()),
        }
    }

    /// Fills one night action slot; `None` clears it. A seer check is
    /// answered immediately.
    pub fn submit_night_action(
        &mut self,
        kind: NightActionKind,
        target: Option<PlayerId>,
    ) -> Result<Option<SeerResult>, Rejection> {
        phase::require_phase(&self.state, Phase::Night)?;
        let Some(id) = target else {
            self.state.pending_night.set(kind, None);
            return Ok(None);
        };

        let player = self.living_target(id)?;
        if !self.actor_alive(kind) {
            return Err(Rejection::NoActor(kind));
        }
        if kind == NightActionKind::WolfTarget && player.is_werewolf() {
            return Err(Rejection::WolfTargetIsWerewolf {
                player: id,
                name: player.name.clone(),
            });
        }
        if kind == NightActionKind::GamblerBet
            && self.state.night_number < self.config.gambler_first_night
        {
            return Err(Rejection::GamblerNotReady {
                first_night: self.config.gambler_first_night,
            });
        }

        self.state.pending_night.set(kind, Some(id));
        debug!(%kind, target = %id, "night action set");
        if kind == NightActionKind::SeerCheck {
            return Ok(night::seer_check(&mut self.state, id));
        }
        Ok(None)
    }

    /// Sets or clears the day's vote target.
    pub fn submit_day_vote(&mut self, target: Option<PlayerId>) -> Result<(), Rejection> {
        phase::require_phase(&self.state, Phase::Day)?;
        if let Some(id) = target {
            self.living_target(id)?;
        }
        self.state.pending_vote = target;
        Ok(())
    }

    /// Closes the vote now, as the host.
    pub fn resolve_vote_now(&mut self) -> Result<VoteResolution, Rejection> {
        self.end_vote(VoteEnd::Host)
    }

    /// Closes the vote, either by the host or because the caller's timer ran out.
    pub fn end_vote(&mut self, how: VoteEnd) -> Result<VoteResolution, Rejection> {
        phase::require_phase(&self.state, Phase::Day)?;
        self.state.log.push(Outcome::VoteEnded { how });
        day::resolve_vote(&mut self.state)
    }

    /// The players the host may pick for `kind` right now.
    pub fn eligible_targets(&self, kind: NightActionKind) -> Vec<PlayerId> {
        if phase::require_phase(&self.state, Phase::Night).is_err() || !self.actor_alive(kind) {
            return Vec::new();
        }
        let roster = &self.state.roster;
        let last = self.state.constraints.last(kind);
        match kind {
            NightActionKind::WolfTarget => roster
                .alive()
                .filter(|p| !p.is_werewolf())
                .map(|p| p.id)
                .collect(),
            NightActionKind::GuardProtect | NightActionKind::SorcererMute => roster
                .alive()
                .filter(|p| Some(p.id) != last)
                .map(|p| p.id)
                .collect(),
            NightActionKind::WitchHeal => {
                if self.state.resources.heal_charges() == 0 {
                    return Vec::new();
                }
                self.state
                    .pending_night
                    .wolf_target
                    .filter(|&id| roster.is_alive(id))
                    .into_iter()
                    .collect()
            }
            NightActionKind::WitchPoison if self.state.resources.poison_charges() == 0 => Vec::new(),
            NightActionKind::GamblerBet
                if self.state.night_number < self.config.gambler_first_night =>
            {
                Vec::new()
            }
            NightActionKind::WitchPoison | NightActionKind::GamblerBet | NightActionKind::SeerCheck => {
                roster.alive().map(|p| p.id).collect()
            }
        }
    }

    /// Discards everything and returns to Setup. The rules are kept.
    pub fn reset_game(&mut self) {
        self.state = GameState::new(&self.config);
    }

    pub fn serialize_state(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    /// Replaces the state with a snapshot. On error the current state is kept.
    pub fn deserialize_state(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        let state = snapshot
            .into_state()
            .inspect_err(|e| warn!(error = %e, "snapshot rejected"))?;
        self.state = state;
        self.state.log.push(Outcome::SnapshotLoaded);
        Ok(())
    }

    pub fn save_json(&self) -> Result<String, SnapshotError> {
        self.serialize_state().to_json()
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), SnapshotError> {
        let snapshot = Snapshot::from_json(json)?;
        self.deserialize_state(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> (Engine, Vec<PlayerId>) {
        let mut engine = Engine::with_seed(7);
        let ids = [
            ("Wolf", Role::Werewolf),
            ("Guard", Role::Guard),
            ("Witch", Role::Witch),
            ("Seer", Role::Seer),
            ("Ann", Role::Villager),
            ("Bo", Role::Villager),
        ]
        .into_iter()
        .map(|(name, role)| engine.add_player(name, role).unwrap().id)
        .collect();
        (engine, ids)
    }

    #[test]
    fn first_player_starts_day_one() {
        let mut engine = Engine::with_seed(1);
        assert_eq!(engine.phase(), Phase::Setup);
        engine.add_player("Ann", Role::Villager).unwrap();
        assert_eq!(engine.phase(), Phase::Day);
        assert_eq!(engine.day_number(), 1);
        assert_eq!(engine.night_number(), 0);
        engine.add_player("Bo", Role::Werewolf).unwrap();
        assert_eq!(engine.day_number(), 1);
    }

    #[test]
    fn blank_names_rejected() {
        let mut engine = Engine::with_seed(1);
        assert_eq!(engine.add_player("   ", Role::Villager), Err(Rejection::BlankName));
        assert_eq!(engine.phase(), Phase::Setup);
    }

    #[test]
    fn seeded_ids_are_reproducible_and_unique() {
        let (a, ids_a) = table();
        let (_, ids_b) = table();
        assert_eq!(ids_a, ids_b);
        let mut sorted = ids_a.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), a.roster().len());
    }

    #[test]
    fn night_actions_only_at_night() {
        let (mut engine, ids) = table();
        assert!(matches!(
            engine.submit_night_action(NightActionKind::WolfTarget, Some(ids[4])),
            Err(Rejection::WrongPhase { .. })
        ));
        engine.start_night().unwrap();
        assert_eq!(
            engine.submit_night_action(NightActionKind::WolfTarget, Some(ids[4])),
            Ok(None)
        );
        assert_eq!(engine.state().pending_night.wolf_target, Some(ids[4]));
    }

    #[test]
    fn wolves_cannot_target_wolves() {
        let (mut engine, ids) = table();
        engine.start_night().unwrap();
        assert!(matches!(
            engine.submit_night_action(NightActionKind::WolfTarget, Some(ids[0])),
            Err(Rejection::WolfTargetIsWerewolf { .. })
        ));
        assert!(!engine.eligible_targets(NightActionKind::WolfTarget).contains(&ids[0]));
    }

    #[test]
    fn absent_actor_is_rejected() {
        let (mut engine, ids) = table();
        engine.start_night().unwrap();
        assert_eq!(
            engine.submit_night_action(NightActionKind::SorcererMute, Some(ids[4])),
            Err(Rejection::NoActor(NightActionKind::SorcererMute))
        );
        assert!(engine.eligible_targets(NightActionKind::SorcererMute).is_empty());
    }

    #[test]
    fn unknown_target_rejected() {
        let (mut engine, _) = table();
        engine.start_night().unwrap();
        let stranger = PlayerId::from_raw(0);
        assert_eq!(
            engine.submit_night_action(NightActionKind::GuardProtect, Some(stranger)),
            Err(Rejection::UnknownPlayer(stranger))
        );
    }

    #[test]
    fn clearing_a_slot() {
        let (mut engine, ids) = table();
        engine.start_night().unwrap();
        engine
            .submit_night_action(NightActionKind::GuardProtect, Some(ids[4]))
            .unwrap();
        engine
            .submit_night_action(NightActionKind::GuardProtect, None)
            .unwrap();
        assert_eq!(engine.state().pending_night.guard_protect, None);
    }

    #[test]
    fn seer_answers_immediately() {
        let (mut engine, ids) = table();
        engine.start_night().unwrap();
        let result = engine
            .submit_night_action(NightActionKind::SeerCheck, Some(ids[0]))
            .unwrap();
        assert_eq!(
            result,
            Some(SeerResult {
                target: ids[0],
                is_werewolf: true
            })
        );
        assert!(matches!(
            engine.log().latest().map(|e| &e.outcome),
            Some(Outcome::SeerReveal { werewolf: true, .. })
        ));
    }

    #[test]
    fn heal_offered_only_for_bite_target() {
        let (mut engine, ids) = table();
        engine.start_night().unwrap();
        assert!(engine.eligible_targets(NightActionKind::WitchHeal).is_empty());
        engine
            .submit_night_action(NightActionKind::WolfTarget, Some(ids[5]))
            .unwrap();
        assert_eq!(engine.eligible_targets(NightActionKind::WitchHeal), vec![ids[5]]);
    }

    #[test]
    fn guard_options_exclude_last_choice() {
        let (mut engine, ids) = table();
        engine.start_night().unwrap();
        engine
            .submit_night_action(NightActionKind::GuardProtect, Some(ids[4]))
            .unwrap();
        engine.start_day().unwrap();
        engine.start_night().unwrap();
        let options = engine.eligible_targets(NightActionKind::GuardProtect);
        assert!(!options.contains(&ids[4]));
        assert_eq!(options.len(), engine.alive_count() - 1);
    }

    #[test]
    fn gambler_waits_for_second_night() {
        let mut engine = Engine::with_seed(3);
        engine.add_player("Wolf", Role::Werewolf).unwrap();
        let gambler = engine.add_player("Gambler", Role::Gambler).unwrap().id;
        engine.add_player("Ann", Role::Villager).unwrap();
        engine.add_player("Bo", Role::Villager).unwrap();
        engine.start_night().unwrap();
        assert_eq!(
            engine.submit_night_action(NightActionKind::GamblerBet, Some(gambler)),
            Err(Rejection::GamblerNotReady { first_night: 2 })
        );
        assert!(engine.eligible_targets(NightActionKind::GamblerBet).is_empty());
        engine.start_day().unwrap();
        engine.start_night().unwrap();
        assert_eq!(engine.eligible_targets(NightActionKind::GamblerBet).len(), 4);
    }

    #[test]
    fn vote_only_by_day_and_on_living_players() {
        let (mut engine, ids) = table();
        assert_eq!(engine.submit_day_vote(Some(ids[4])), Ok(()));
        engine.start_night().unwrap();
        assert!(!engine.roster().is_alive(ids[4]));
        assert!(matches!(
            engine.submit_day_vote(Some(ids[5])),
            Err(Rejection::WrongPhase { .. })
        ));
        assert!(matches!(
            engine.resolve_vote_now(),
            Err(Rejection::WrongPhase { .. })
        ));
        engine.start_day().unwrap();
        assert!(matches!(
            engine.submit_day_vote(Some(ids[4])),
            Err(Rejection::TargetDead { .. })
        ));
    }

    #[test]
    fn timer_expiry_is_logged() {
        let (mut engine, ids) = table();
        engine.submit_day_vote(Some(ids[5])).unwrap();
        assert_eq!(
            engine.end_vote(VoteEnd::TimerExpired),
            Ok(VoteResolution::Eliminated(ids[5]))
        );
        assert!(engine.log().iter().any(|e| e.outcome
            == Outcome::VoteEnded {
                how: VoteEnd::TimerExpired
            }));
    }

    #[test]
    fn reset_returns_to_setup() {
        let (mut engine, _) = table();
        engine.start_night().unwrap();
        engine.reset_game();
        assert_eq!(engine.phase(), Phase::Setup);
        assert!(engine.roster().is_empty());
        assert!(engine.log().is_empty());
        assert_eq!(engine.night_number(), 0);
    }

    #[test]
    fn clear_log_keeps_game() {
        let (mut engine, _) = table();
        engine.clear_log();
        assert!(engine.log().is_empty());
        assert_eq!(engine.roster().len(), 6);
        assert_eq!(engine.phase(), Phase::Day);
    }

    #[test]
    fn no_players_after_game_over() {
        let mut engine = Engine::with_seed(5);
        let wolf = engine.add_player("Wolf", Role::Werewolf).unwrap().id;
        engine.add_player("Ann", Role::Villager).unwrap();
        engine.add_player("Bo", Role::Villager).unwrap();
        engine.submit_day_vote(Some(wolf)).unwrap();
        engine.resolve_vote_now().unwrap();
        assert!(engine.is_game_over());
        assert_eq!(engine.add_player("Late", Role::Villager), Err(Rejection::GameOver));
        assert_eq!(engine.start_night(), Err(Rejection::GameOver));
    }
}
