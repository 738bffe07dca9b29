//! Day vote resolution.
//!
//! The host enters a single vote target. Resolving it either kills the
//! target, spares a first-time Prince, or, for the Alpha Wolf, ends the game
//! for the village on the spot.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::event::Outcome;
use crate::resolve::rejection::Rejection;
use crate::resolve::win::{self, VillageReason, Verdict};
use crate::roster::{GameState, PlayerId, VoteRule};

/// Who closed the vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteEnd {
    /// The host pressed "end vote".
    Host,
    /// The caller's countdown ran out.
    TimerExpired,
}

/// What resolving the vote did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteResolution {
    NoVote,
    /// The target was unknown or already dead.
    Invalid(PlayerId),
    /// A Prince survived by revealing their role.
    Revealed(PlayerId),
    Eliminated(PlayerId),
    /// The Alpha Wolf died and the village won.
    AlphaWolfEliminated(PlayerId),
}

/// Resolves the pending vote. Rejected once the game is over.
pub fn resolve_vote(state: &mut GameState) -> Result<VoteResolution, Rejection> {
    if state.game_over {
        return Err(Rejection::GameOver);
    }
    let Some(target) = state.pending_vote else {
        state.log.push(Outcome::NoVote);
        return Ok(VoteResolution::NoVote);
    };
    let Some(player) = state.roster.get_mut(target).filter(|p| p.alive) else {
        state.log.push(Outcome::InvalidVote { player: target });
        return Ok(VoteResolution::Invalid(target));
    };

    let name = player.name.clone();
    let resolution = match player.role.vote_rule() {
        VoteRule::DiesAndVillageWins => {
            state.roster.kill(target);
            state.log.push(Outcome::AlphaWolfLynched { player: target, name });
            state.pending_vote = None;
            win::declare(
                state,
                Verdict::VillagersWin {
                    reason: VillageReason::AlphaWolfEliminated,
                },
            );
            VoteResolution::AlphaWolfEliminated(target)
        }
        VoteRule::SurvivesOnce if !player.special_used => {
            player.special_used = true;
            player.true_role_revealed = true;
            state.log.push(Outcome::PrinceRevealed { player: target, name });
            state.pending_vote = None;
            win::check_win(state);
            VoteResolution::Revealed(target)
        }
        VoteRule::SurvivesOnce | VoteRule::Dies => {
            state.roster.kill(target);
            state.log.push(Outcome::Lynched { player: target, name });
            state.pending_vote = None;
            win::check_win(state);
            VoteResolution::Eliminated(target)
        }
    };
    info!(?resolution, day = state.day_number, "vote resolved");
    Ok(resolution)
}
