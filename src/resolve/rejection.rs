//! Host input that the engine refuses.
//!
//! A rejection never changes state. The `Display` text is the reason shown
//! to the host.

use crate::roster::{NightActionKind, Phase, PlayerId};

/// Precondition violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("add players first")]
    NotStarted,

    #[error("the game is already over")]
    GameOver,

    #[error("only allowed during the {expected} phase (currently {actual})")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("player name must not be blank")]
    BlankName,

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("{name} is dead")]
    TargetDead { player: PlayerId, name: String },

    #[error("nobody alive can perform the {0}")]
    NoActor(NightActionKind),

    #[error("werewolves cannot bite {name}, a werewolf")]
    WolfTargetIsWerewolf { player: PlayerId, name: String },

    #[error("the gambler may only bet from night {first_night}")]
    GamblerNotReady { first_night: u32 },

    #[error("the {0} counter cannot go any higher")]
    CounterExhausted(Phase),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_read_naturally() {
        let wrong = Rejection::WrongPhase {
            expected: Phase::Night,
            actual: Phase::Day,
        };
        assert_eq!(wrong.to_string(), "only allowed during the night phase (currently day)");
        assert_eq!(
            Rejection::NoActor(NightActionKind::GuardProtect).to_string(),
            "nobody alive can perform the guard protection"
        );
    }
}
