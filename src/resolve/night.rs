//! Night resolution.
//!
//! Resolves the night's action set as a fixed pipeline of named steps. The
//! order is part of the rules: constraint checks come first, the mute and
//! guard choices are remembered before any outcome is known, potions are
//! validated before the gambler acts, and the poison kill is applied last so
//! that a bite and a poison can claim two different victims (or the same
//! victim twice over, when the bite itself was blocked).
//!
//! Every kill goes through [`NightContext::kill`], which re-checks that the
//! target is still alive and runs the win check immediately afterwards.

use tracing::{debug, info};

use crate::config::RulesConfig;
use crate::event::Outcome;
use crate::resolve::rejection::Rejection;
use crate::resolve::win::{self, Verdict};
use crate::roster::{BiteRule, GameState, NightActionKind, NightActionSet, PlayerId, Role};

/// A named step of night resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NightStep {
    EnforceConstraints,
    RecordMute,
    ResolveBiteTarget,
    RecordGuard,
    ResolveHeal,
    ResolvePoison,
    ResolveGambler,
    ResolveBite,
    ApplyPoison,
}

/// The steps in the order they run.
pub const NIGHT_PIPELINE: [NightStep; 9] = [
    NightStep::EnforceConstraints,
    NightStep::RecordMute,
    NightStep::ResolveBiteTarget,
    NightStep::RecordGuard,
    NightStep::ResolveHeal,
    NightStep::ResolvePoison,
    NightStep::ResolveGambler,
    NightStep::ResolveBite,
    NightStep::ApplyPoison,
];

impl NightStep {
    pub const fn name(self) -> &'static str {
        match self {
            NightStep::EnforceConstraints => "enforce_constraints",
            NightStep::RecordMute => "record_mute",
            NightStep::ResolveBiteTarget => "resolve_bite_target",
            NightStep::RecordGuard => "record_guard",
            NightStep::ResolveHeal => "resolve_heal",
            NightStep::ResolvePoison => "resolve_poison",
            NightStep::ResolveGambler => "resolve_gambler",
            NightStep::ResolveBite => "resolve_bite",
            NightStep::ApplyPoison => "apply_poison",
        }
    }

    pub fn run(self, ctx: &mut NightContext<'_>) {
        debug!(step = self.name(), night = ctx.state.night_number, "night step");
        match self {
            NightStep::EnforceConstraints => enforce_constraints(ctx),
            NightStep::RecordMute => record_mute(ctx),
            NightStep::ResolveBiteTarget => resolve_bite_target(ctx),
            NightStep::RecordGuard => record_guard(ctx),
            NightStep::ResolveHeal => resolve_heal(ctx),
            NightStep::ResolvePoison => resolve_poison(ctx),
            NightStep::ResolveGambler => resolve_gambler(ctx),
            NightStep::ResolveBite => resolve_bite(ctx),
            NightStep::ApplyPoison => apply_poison(ctx),
        }
    }
}

/// What a resolved night did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NightReport {
    /// Deaths in the order they happened.
    pub deaths: Vec<PlayerId>,
    /// The Cursed player turned by the bite, if any.
    pub transformed: Option<PlayerId>,
    /// The verdict reached during this night, if any.
    pub verdict: Option<Verdict>,
}

/// Working state for one night's resolution.
#[derive(Debug)]
pub struct NightContext<'a> {
    pub state: &'a mut GameState,
    config: &'a RulesConfig,
    /// Working copy of the submitted actions; constraint checks may drop slots.
    pub actions: NightActionSet,
    pub bite: Option<PlayerId>,
    pub protected: Option<PlayerId>,
    pub healed: bool,
    pub poison: Option<PlayerId>,
    pub report: NightReport,
}

impl<'a> NightContext<'a> {
    pub fn new(state: &'a mut GameState, config: &'a RulesConfig) -> Self {
        let actions = state.pending_night;
        NightContext {
            state,
            config,
            actions,
            bite: None,
            protected: None,
            healed: false,
            poison: None,
            report: NightReport::default(),
        }
    }

    fn is_alive(&self, id: PlayerId) -> bool {
        self.state.roster.is_alive(id)
    }

    fn name_of(&self, id: PlayerId) -> String {
        self.state.roster.name_of(id).to_string()
    }

    /// Logs an action that resolved to nothing.
    fn ignore(&mut self, kind: NightActionKind, id: PlayerId) {
        debug!(%kind, player = %id, "night action ignored");
        let name = self.name_of(id);
        self.state.log.push(Outcome::ActionIgnored {
            kind,
            player: id,
            name,
        });
    }

    /// Kills a living player, logs `outcome`, and runs the win check.
    /// Does nothing for players who are already dead.
    fn kill(&mut self, id: PlayerId, outcome: Outcome) -> bool {
        if !self.state.roster.kill(id) {
            return false;
        }
        info!(player = %id, night = self.state.night_number, "killed at night");
        self.state.log.push(outcome);
        self.report.deaths.push(id);
        if let Some(verdict) = win::check_win(self.state) {
            self.report.verdict = Some(verdict);
        }
        true
    }

    /// Runs every step in order and returns the report.
    pub fn run_all(mut self) -> NightReport {
        for step in NIGHT_PIPELINE {
            step.run(&mut self);
        }
        self.report
    }
}

/// Resolves the pending night actions. Rejected once the game is over.
pub fn resolve_night(state: &mut GameState, config: &RulesConfig) -> Result<NightReport, Rejection> {
    if state.game_over {
        return Err(Rejection::GameOver);
    }
    Ok(NightContext::new(state, config).run_all())
}

/// Drops a guard or mute choice that repeats last night's.
pub fn enforce_constraints(ctx: &mut NightContext<'_>) {
    for kind in [NightActionKind::GuardProtect, NightActionKind::SorcererMute] {
        let Some(target) = ctx.actions.get(kind) else {
            continue;
        };
        if ctx.state.constraints.is_repeat(kind, target) {
            ctx.actions.set(kind, None);
            let name = ctx.name_of(target);
            ctx.state.log.push(Outcome::ConstraintViolation {
                kind,
                player: target,
                name,
            });
        }
    }
}

/// Announces the mute and remembers it, whether or not the target survives.
pub fn record_mute(ctx: &mut NightContext<'_>) {
    let Some(target) = ctx.actions.sorcerer_mute else {
        return;
    };
    if !ctx.state.roster.contains(target) {
        return;
    }
    let name = ctx.name_of(target);
    let day = ctx.state.day_number + 1;
    ctx.state.log.push(Outcome::Muted {
        player: target,
        name,
        day,
    });
    ctx.state.constraints.record_mute_choice(target);
}

/// The bite only counts against a living player.
pub fn resolve_bite_target(ctx: &mut NightContext<'_>) {
    let Some(target) = ctx.actions.wolf_target else {
        return;
    };
    if ctx.is_alive(target) {
        ctx.bite = Some(target);
    } else {
        ctx.ignore(NightActionKind::WolfTarget, target);
    }
}

/// Remembers the guard's choice; the choice, not the outcome, sets the constraint.
pub fn record_guard(ctx: &mut NightContext<'_>) {
    if let Some(target) = ctx.actions.guard_protect {
        ctx.state.constraints.record_guard_choice(target);
        ctx.protected = Some(target);
    }
}

/// The heal only works on tonight's bite target.
pub fn resolve_heal(ctx: &mut NightContext<'_>) {
    let Some(heal) = ctx.actions.witch_heal else {
        return;
    };
    let Some(bite) = ctx.bite.filter(|&bite| bite == heal) else {
        debug!(heal = %heal, bite = ?ctx.bite, "heal does not match the bite target");
        let name = ctx.name_of(heal);
        ctx.state.log.push(Outcome::HealIgnored { player: heal, name });
        return;
    };
    if !ctx.state.resources.try_consume_heal() {
        ctx.state.log.push(Outcome::HealUnavailable);
        return;
    }
    ctx.healed = true;
    let name = ctx.name_of(bite);
    ctx.state.log.push(Outcome::HealUsed { player: bite, name });
}

/// Validates the poison and spends the charge; the kill happens in [`apply_poison`].
pub fn resolve_poison(ctx: &mut NightContext<'_>) {
    let Some(target) = ctx.actions.witch_poison else {
        return;
    };
    if !ctx.is_alive(target) {
        ctx.ignore(NightActionKind::WitchPoison, target);
        return;
    }
    if !ctx.state.resources.try_consume_poison() {
        ctx.state.log.push(Outcome::PoisonUnavailable);
        return;
    }
    ctx.poison = Some(target);
    let name = ctx.name_of(target);
    ctx.state.log.push(Outcome::PoisonUsed { player: target, name });
}

/// A right bet kills the werewolf, a wrong one kills the gambler.
pub fn resolve_gambler(ctx: &mut NightContext<'_>) {
    let Some(bet) = ctx.actions.gambler_bet else {
        return;
    };
    let active = ctx.state.night_number >= ctx.config.gambler_first_night;
    let gambler = ctx.state.roster.living_with_role(Role::Gambler).map(|p| p.id);
    let target = ctx.state.roster.get(bet).filter(|p| p.alive);
    let (true, Some(gambler), Some(target)) = (active, gambler, target) else {
        ctx.ignore(NightActionKind::GamblerBet, bet);
        return;
    };

    if target.is_werewolf() {
        let name = target.name.clone();
        ctx.kill(bet, Outcome::GamblerWon { player: bet, name });
    } else {
        let name = ctx.name_of(gambler);
        ctx.kill(gambler, Outcome::GamblerLost { player: gambler, name });
    }
}

/// Applies the bite: guard first, then heal, then the victim's own bite rule.
pub fn resolve_bite(ctx: &mut NightContext<'_>) {
    let Some(bite) = ctx.bite else {
        ctx.state.log.push(Outcome::NoVictim);
        return;
    };
    let Some(victim) = ctx.state.roster.get(bite).filter(|p| p.alive) else {
        ctx.ignore(NightActionKind::WolfTarget, bite);
        return;
    };
    let name = victim.name.clone();
    let rule = victim.role.bite_rule();

    if ctx.protected == Some(bite) {
        ctx.state.log.push(Outcome::Protected { player: bite, name });
    } else if ctx.healed {
        ctx.state.log.push(Outcome::BiteHealed { player: bite, name });
    } else {
        match rule {
            BiteRule::TurnsWerewolf => {
                if ctx.state.roster.turn_werewolf(bite) {
                    info!(player = %bite, "cursed player turned");
                    ctx.report.transformed = Some(bite);
                    ctx.state.log.push(Outcome::Transformed { player: bite, name });
                    // A turn shifts the headcount just like a death does.
                    if let Some(verdict) = win::check_win(ctx.state) {
                        ctx.report.verdict = Some(verdict);
                    }
                }
            }
            BiteRule::Dies => {
                ctx.kill(bite, Outcome::Bitten { player: bite, name });
            }
        }
    }
}

/// The poison kills regardless of guard or heal.
pub fn apply_poison(ctx: &mut NightContext<'_>) {
    let Some(target) = ctx.poison else {
        return;
    };
    if ctx.is_alive(target) {
        let name = ctx.name_of(target);
        ctx.kill(target, Outcome::PoisonKill { player: target, name });
    }
}

/// Result of a seer check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeerResult {
    pub target: PlayerId,
    pub is_werewolf: bool,
}

/// Answers a seer check on the spot from the target's current role.
/// A Cursed player reads as not-werewolf until turned.
pub fn seer_check(state: &mut GameState, target: PlayerId) -> Option<SeerResult> {
    let player = state.roster.get(target)?;
    let result = SeerResult {
        target,
        is_werewolf: player.is_werewolf(),
    };
    let name = player.name.clone();
    state.log.push(Outcome::SeerReveal {
        player: target,
        name,
        werewolf: result.is_werewolf,
    });
    Some(result)
}
