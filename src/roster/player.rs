//! Players and the roster.
//!
//! The roster keeps players in the order the host added them. Order matters
//! only for display; every resolver looks players up by id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Opaque player identifier, displayed as 16 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(u64);

impl PlayerId {
    pub const fn from_raw(raw: u64) -> Self {
        PlayerId(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u64::from_str_radix(s, 16).map(PlayerId)
    }
}

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub alive: bool,
    /// Set when the player's role has been shown to the table.
    pub true_role_revealed: bool,
    /// One-shot survival already spent (Prince only).
    pub special_used: bool,
}

impl Player {
    /// Creates a living player with no revealed role.
    pub fn new(id: PlayerId, name: impl Into<String>, role: Role) -> Self {
        Player {
            id,
            name: name.into(),
            role,
            alive: true,
            true_role_revealed: false,
            special_used: false,
        }
    }

    pub fn is_werewolf(&self) -> bool {
        self.role.is_werewolf()
    }
}

/// Ordered collection of players.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Roster { players: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Iterates over all players in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Appends a player. Returns false if the id is already seated.
    pub fn push(&mut self, player: Player) -> bool {
        if self.contains(player.id) {
            return false;
        }
        self.players.push(player);
        true
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Returns the player's name, or an empty string for unknown ids.
    pub fn name_of(&self, id: PlayerId) -> &str {
        self.get(id).map_or("", |p| p.name.as_str())
    }

    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.get(id).is_some_and(|p| p.alive)
    }

    pub fn alive(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    pub fn alive_werewolf_count(&self) -> usize {
        self.alive().filter(|p| p.is_werewolf()).count()
    }

    pub fn any_werewolf_alive(&self) -> bool {
        self.alive().any(|p| p.is_werewolf())
    }

    pub fn is_role_alive(&self, role: Role) -> bool {
        self.alive().any(|p| p.role == role)
    }

    /// Returns the first living player holding `role`.
    pub fn living_with_role(&self, role: Role) -> Option<&Player> {
        self.alive().find(|p| p.role == role)
    }

    /// Marks a living player dead. Returns false if the player is unknown or
    /// already dead; `alive` never goes back to true.
    pub fn kill(&mut self, id: PlayerId) -> bool {
        match self.get_mut(id) {
            Some(p) if p.alive => {
                p.alive = false;
                true
            }
            _ => false,
        }
    }

    /// Turns a living Cursed player into a werewolf in place.
    /// Returns false for anyone else, so the change happens at most once.
    pub fn turn_werewolf(&mut self, id: PlayerId) -> bool {
        match self.get_mut(id) {
            Some(p) if p.alive && p.role == Role::Cursed => {
                p.role = Role::Werewolf;
                true
            }
            _ => false,
        }
    }
}

impl FromIterator<Player> for Roster {
    fn from_iter<I: IntoIterator<Item = Player>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for player in iter {
            roster.push(player);
        }
        roster
    }
}
