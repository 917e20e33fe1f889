//! Match configuration and the turn state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MatchConfig
// ---------------------------------------------------------------------------

/// Settings for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seats per match. The match starts when all are filled and ends
    /// early if anyone leaves.
    pub players: usize,

    /// Rolls allowed per turn. 0 means unlimited.
    pub max_rolls_per_turn: u32,

    /// Send `DICE:` to every participant instead of only the roller.
    pub share_dice: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            players: 2,
            max_rolls_per_turn: 0,
            share_dice: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where the match is in its turn cycle.
///
/// ```text
///            ROLL              ROLL
/// AwaitingRoll ──→ AwaitingMove ──┐
///      ↑               │  ↑───────┘
///      └──── MOVE ─────┤
///                      │ MOVE (last category)
///                      ▼
///                  MatchOver ──(all RESTART votes)──→ AwaitingRoll
///
/// any phase ──(participant leaves)──→ Abandoned
/// ```
///
/// Waiting for players happens before a coordinator exists and is the
/// session registry's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// The active participant may roll.
    AwaitingRoll,
    /// The active participant has rolled and may roll again or commit.
    AwaitingMove,
    /// Every sheet is full; only RESTART votes are accepted.
    MatchOver,
    /// A participant left. Terminal: the actor stops.
    Abandoned,
}

impl Phase {
    /// Returns `true` while ROLL and MOVE are accepted.
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::AwaitingRoll | Self::AwaitingMove)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Abandoned)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingRoll => write!(f, "AwaitingRoll"),
            Self::AwaitingMove => write!(f, "AwaitingMove"),
            Self::MatchOver => write!(f, "MatchOver"),
            Self::Abandoned => write!(f, "Abandoned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_is_playing() {
        assert!(Phase::AwaitingRoll.is_playing());
        assert!(Phase::AwaitingMove.is_playing());
        assert!(!Phase::MatchOver.is_playing());
        assert!(!Phase::Abandoned.is_playing());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::AwaitingMove.to_string(), "AwaitingMove");
        assert_eq!(Phase::MatchOver.to_string(), "MatchOver");
    }

    #[test]
    fn test_match_config_default() {
        let config = MatchConfig::default();
        assert_eq!(config.players, 2);
        assert_eq!(config.max_rolls_per_turn, 0);
        assert!(!config.share_dice);
    }
}
