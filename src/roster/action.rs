//! Night action slots.
//!
//! Each night the host fills at most one target per action kind. The set is
//! wiped when the next night starts.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use super::role::Role;

/// The kinds of night action the host can enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightActionKind {
    WolfTarget,
    GuardProtect,
    WitchHeal,
    WitchPoison,
    SorcererMute,
    GamblerBet,
    SeerCheck,
}

pub const ALL_NIGHT_ACTIONS: [NightActionKind; 7] = [
    NightActionKind::WolfTarget,
    NightActionKind::GuardProtect,
    NightActionKind::WitchHeal,
    NightActionKind::WitchPoison,
    NightActionKind::SorcererMute,
    NightActionKind::GamblerBet,
    NightActionKind::SeerCheck,
];

impl NightActionKind {
    /// The role that performs this action. For `WolfTarget` any living
    /// werewolf acts for the pack.
    pub const fn actor(self) -> Role {
        match self {
            NightActionKind::WolfTarget => Role::Werewolf,
            NightActionKind::GuardProtect => Role::Guard,
            NightActionKind::WitchHeal | NightActionKind::WitchPoison => Role::Witch,
            NightActionKind::SorcererMute => Role::Sorcerer,
            NightActionKind::GamblerBet => Role::Gambler,
            NightActionKind::SeerCheck => Role::Seer,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            NightActionKind::WolfTarget => "wolf bite",
            NightActionKind::GuardProtect => "guard protection",
            NightActionKind::WitchHeal => "witch heal",
            NightActionKind::WitchPoison => "witch poison",
            NightActionKind::SorcererMute => "sorcerer mute",
            NightActionKind::GamblerBet => "gambler bet",
            NightActionKind::SeerCheck => "seer check",
        }
    }
}

impl fmt::Display for NightActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The pending night actions, one optional target per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightActionSet {
    pub wolf_target: Option<PlayerId>,
    pub guard_protect: Option<PlayerId>,
    pub witch_heal: Option<PlayerId>,
    pub witch_poison: Option<PlayerId>,
    pub sorcerer_mute: Option<PlayerId>,
    pub gambler_bet: Option<PlayerId>,
    pub seer_check: Option<PlayerId>,
}

impl NightActionSet {
    pub fn get(&self, kind: NightActionKind) -> Option<PlayerId> {
        match kind {
            NightActionKind::WolfTarget => self.wolf_target,
            NightActionKind::GuardProtect => self.guard_protect,
            NightActionKind::WitchHeal => self.witch_heal,
            NightActionKind::WitchPoison => self.witch_poison,
            NightActionKind::SorcererMute => self.sorcerer_mute,
            NightActionKind::GamblerBet => self.gambler_bet,
            NightActionKind::SeerCheck => self.seer_check,
        }
    }

    /// Overwrites one slot; `None` clears it.
    pub fn set(&mut self, kind: NightActionKind, target: Option<PlayerId>) {
        let slot = match kind {
            NightActionKind::WolfTarget => &mut self.wolf_target,
            NightActionKind::GuardProtect => &mut self.guard_protect,
            NightActionKind::WitchHeal => &mut self.witch_heal,
            NightActionKind::WitchPoison => &mut self.witch_poison,
            NightActionKind::SorcererMute => &mut self.sorcerer_mute,
            NightActionKind::GamblerBet => &mut self.gambler_bet,
            NightActionKind::SeerCheck => &mut self.seer_check,
        };
        *slot = target;
    }

    pub fn clear(&mut self) {
        *self = NightActionSet::default();
    }

    /// Iterates over the filled slots in declaration order.
    pub fn filled(&self) -> impl Iterator<Item = (NightActionKind, PlayerId)> + '_ {
        ALL_NIGHT_ACTIONS
            .iter()
            .filter_map(move |&kind| self.get(kind).map(|id| (kind, id)))
    }

    pub fn is_empty(&self) -> bool {
        self.filled().next().is_none()
    }
}
