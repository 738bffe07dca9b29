//! Roles and factions.
//!
//! Roles form a closed set. Every rule that depends on a role goes through
//! one of the exhaustive classification methods here so that adding a role
//! forces every resolver to decide how to treat it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The side a role plays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Village,
    Werewolves,
}

/// A secret role dealt to a player by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Werewolf,
    /// A werewolf whose elimination by vote hands the game to the village.
    AlphaWolf,
    Guard,
    Seer,
    Witch,
    Sorcerer,
    Gambler,
    /// Survives the first vote against them by revealing their role.
    Prince,
    /// Looks like a villager; an unprotected bite turns them into a werewolf.
    Cursed,
    Villager,
}

/// All roles in declaration order.
pub const ALL_ROLES: [Role; 10] = [
    Role::Werewolf,
    Role::AlphaWolf,
    Role::Guard,
    Role::Seer,
    Role::Witch,
    Role::Sorcerer,
    Role::Gambler,
    Role::Prince,
    Role::Cursed,
    Role::Villager,
];

/// What happens when the day vote lands on a living player of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteRule {
    /// The player dies.
    Dies,
    /// The player dies and the village wins on the spot.
    DiesAndVillageWins,
    /// The first vote reveals the role instead of killing; later votes kill.
    SurvivesOnce,
}

/// What happens when an unprotected, unhealed werewolf bite lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiteRule {
    Dies,
    /// The player survives and becomes a plain werewolf.
    TurnsWerewolf,
}

impl Role {
    /// Returns the faction this role currently counts for.
    pub const fn faction(self) -> Faction {
        match self {
            Role::Werewolf | Role::AlphaWolf => Faction::Werewolves,
            Role::Guard
            | Role::Seer
            | Role::Witch
            | Role::Sorcerer
            | Role::Gambler
            | Role::Prince
            | Role::Cursed
            | Role::Villager => Faction::Village,
        }
    }

    /// True for roles counted as werewolves by the win check, the seer, and the gambler.
    pub const fn is_werewolf(self) -> bool {
        matches!(self.faction(), Faction::Werewolves)
    }

    pub const fn vote_rule(self) -> VoteRule {
        match self {
            Role::AlphaWolf => VoteRule::DiesAndVillageWins,
            Role::Prince => VoteRule::SurvivesOnce,
            Role::Werewolf
            | Role::Guard
            | Role::Seer
            | Role::Witch
            | Role::Sorcerer
            | Role::Gambler
            | Role::Cursed
            | Role::Villager => VoteRule::Dies,
        }
    }

    pub const fn bite_rule(self) -> BiteRule {
        match self {
            Role::Cursed => BiteRule::TurnsWerewolf,
            Role::Werewolf
            | Role::AlphaWolf
            | Role::Guard
            | Role::Seer
            | Role::Witch
            | Role::Sorcerer
            | Role::Gambler
            | Role::Prince
            | Role::Villager => BiteRule::Dies,
        }
    }

    /// Returns the human-readable role name shown to the host.
    pub const fn display_name(self) -> &'static str {
        match self {
            Role::Werewolf => "Werewolf",
            Role::AlphaWolf => "Alpha Wolf",
            Role::Guard => "Guard",
            Role::Seer => "Seer",
            Role::Witch => "Witch",
            Role::Sorcerer => "Sorcerer",
            Role::Gambler => "Gambler",
            Role::Prince => "Prince",
            Role::Cursed => "Cursed",
            Role::Villager => "Villager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
