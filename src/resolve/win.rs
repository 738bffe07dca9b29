//! Win evaluation.
//!
//! The village wins when no werewolf is alive; the werewolves win as soon as
//! they are at least as many as everyone else. The first verdict reached is
//! final.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::event::Outcome;
use crate::roster::{GameState, Roster};

/// Why the village won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VillageReason {
    NoWerewolvesLeft,
    AlphaWolfEliminated,
}

/// A terminal result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "winner", rename_all = "snake_case")]
pub enum Verdict {
    VillagersWin { reason: VillageReason },
    WerewolvesWin,
}

impl Verdict {
    pub const fn winner_text(self) -> &'static str {
        match self {
            Verdict::VillagersWin {
                reason: VillageReason::NoWerewolvesLeft,
            } => "Villagers win (no werewolves left)",
            Verdict::VillagersWin {
                reason: VillageReason::AlphaWolfEliminated,
            } => "Villagers win (the Alpha Wolf was voted out)",
            Verdict::WerewolvesWin => "Werewolves win (werewolves >= villagers)",
        }
    }
}

/// Evaluates the headcount rule on a roster without touching any state.
pub fn evaluate(roster: &Roster) -> Option<Verdict> {
    let wolves = roster.alive_werewolf_count();
    let others = roster.alive_count() - wolves;

    if wolves == 0 {
        return Some(Verdict::VillagersWin {
            reason: VillageReason::NoWerewolvesLeft,
        });
    }
    if wolves >= others {
        return Some(Verdict::WerewolvesWin);
    }
    None
}

/// Records `verdict` unless the game is already over. Returns whether it was recorded.
pub fn declare(state: &mut GameState, verdict: Verdict) -> bool {
    if state.game_over {
        return false;
    }
    info!(winner = verdict.winner_text(), "game over");
    state.game_over = true;
    state.winner = Some(verdict);
    state.log.push(Outcome::GameOver { verdict });
    true
}

/// Runs the headcount rule and declares the verdict if one is reached.
/// Returns the newly declared verdict; a no-op once the game is over.
pub fn check_win(state: &mut GameState) -> Option<Verdict> {
    if state.game_over {
        return None;
    }
    let verdict = evaluate(&state.roster)?;
    declare(state, verdict).then_some(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::roster::{Player, PlayerId, Role};

    fn mk(id: u64, role: Role, alive: bool) -> Player {
        let mut p = Player::new(PlayerId::from_raw(id), format!("p{id}"), role);
        p.alive = alive;
        p
    }

    fn state_with(players: Vec<Player>) -> GameState {
        let mut state = GameState::new(&RulesConfig::default());
        state.roster = players.into_iter().collect();
        state
    }

    #[test]
    fn villagers_win_when_wolves_dead() {
        let roster: Roster = vec![
            mk(1, Role::Werewolf, false),
            mk(2, Role::Seer, true),
            mk(3, Role::Villager, true),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            evaluate(&roster),
            Some(Verdict::VillagersWin {
                reason: VillageReason::NoWerewolvesLeft
            })
        );
    }

    #[test]
    fn wolves_win_on_tie() {
        let roster: Roster = vec![
            mk(1, Role::Werewolf, true),
            mk(2, Role::Villager, true),
            mk(3, Role::Villager, false),
        ]
        .into_iter()
        .collect();
        assert_eq!(evaluate(&roster), Some(Verdict::WerewolvesWin));
    }

    #[test]
    fn ongoing_with_village_majority() {
        let roster: Roster = vec![
            mk(1, Role::Werewolf, true),
            mk(2, Role::AlphaWolf, true),
            mk(3, Role::Villager, true),
            mk(4, Role::Villager, true),
            mk(5, Role::Cursed, true),
        ]
        .into_iter()
        .collect();
        assert_eq!(evaluate(&roster), None);
    }

    #[test]
    fn alpha_wolf_counts_as_werewolf() {
        let roster: Roster = vec![mk(1, Role::AlphaWolf, true), mk(2, Role::Villager, true)]
            .into_iter()
            .collect();
        assert_eq!(evaluate(&roster), Some(Verdict::WerewolvesWin));
    }

    #[test]
    fn verdict_is_sticky() {
        let mut state = state_with(vec![mk(1, Role::Werewolf, false), mk(2, Role::Villager, true)]);
        let first = check_win(&mut state);
        assert!(matches!(first, Some(Verdict::VillagersWin { .. })));
        let logged = state.log.len();

        // Flip the roster so the headcount would now favour the wolves.
        state.roster = vec![mk(1, Role::Werewolf, true), mk(2, Role::Villager, false)]
            .into_iter()
            .collect();
        assert_eq!(check_win(&mut state), None);
        assert!(!declare(&mut state, Verdict::WerewolvesWin));
        assert_eq!(state.winner, first);
        assert_eq!(state.log.len(), logged);
    }

    #[test]
    fn check_win_logs_game_over() {
        let mut state = state_with(vec![mk(1, Role::Werewolf, true), mk(2, Role::Villager, true)]);
        assert_eq!(check_win(&mut state), Some(Verdict::WerewolvesWin));
        assert!(state.game_over);
        assert_eq!(
            state.log.latest().map(|e| &e.outcome),
            Some(&Outcome::GameOver {
                verdict: Verdict::WerewolvesWin
            })
        );
        assert_eq!(state.winner_text(), Some("Werewolves win (werewolves >= villagers)"));
    }
}
