//! Constraint and resource tracking.
//!
//! The guard and the sorcerer may not pick the same player on consecutive
//! nights; the witch's potions are finite and never replenished.

use serde::{Deserialize, Serialize};

use crate::roster::{NightActionKind, PlayerId};

/// Remembers the previous night's guard and mute choices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintTracker {
    pub last_guard_protect: Option<PlayerId>,
    pub last_sorcerer_mute: Option<PlayerId>,
}

impl ConstraintTracker {
    pub fn record_guard_choice(&mut self, id: PlayerId) {
        self.last_guard_protect = Some(id);
    }

    pub fn record_mute_choice(&mut self, id: PlayerId) {
        self.last_sorcerer_mute = Some(id);
    }

    /// The remembered choice for `kind`. Only guard and mute are remembered.
    pub fn last(&self, kind: NightActionKind) -> Option<PlayerId> {
        match kind {
            NightActionKind::GuardProtect => self.last_guard_protect,
            NightActionKind::SorcererMute => self.last_sorcerer_mute,
            NightActionKind::WolfTarget
            | NightActionKind::WitchHeal
            | NightActionKind::WitchPoison
            | NightActionKind::GamblerBet
            | NightActionKind::SeerCheck => None,
        }
    }

    /// Returns whether picking `id` for `kind` repeats last night's choice.
    pub fn is_repeat(&self, kind: NightActionKind, id: PlayerId) -> bool {
        self.last(kind) == Some(id)
    }
}

/// The witch's remaining potions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    heal_charges: u32,
    poison_charges: u32,
}

impl ResourcePool {
    pub const fn new(heal_charges: u32, poison_charges: u32) -> Self {
        ResourcePool {
            heal_charges,
            poison_charges,
        }
    }

    pub const fn heal_charges(&self) -> u32 {
        self.heal_charges
    }

    pub const fn poison_charges(&self) -> u32 {
        self.poison_charges
    }

    /// Spends one heal charge. Returns false (and changes nothing) when empty.
    pub fn try_consume_heal(&mut self) -> bool {
        consume(&mut self.heal_charges)
    }

    /// Spends one poison charge. Returns false (and changes nothing) when empty.
    pub fn try_consume_poison(&mut self) -> bool {
        consume(&mut self.poison_charges)
    }
}

fn consume(charges: &mut u32) -> bool {
    match charges.checked_sub(1) {
        Some(left) => {
            *charges = left;
            true
        }
        None => false,
    }
}
