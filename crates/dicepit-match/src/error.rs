//! Error types for the match layer.

use dicepit_rules::{Category, ParticipantId, RulesError};

/// Why a command was refused.
///
/// Every variant is recovered inside the coordinator: the sender gets the
/// `Display` text as an `INFO:` line and the match state is untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// The sender isn't the active participant.
    #[error("not your turn, waiting for player {}", .current.0)]
    OutOfTurn { current: ParticipantId },

    /// `MOVE` before any `ROLL` this turn.
    #[error("roll the dice before choosing a category")]
    NoDiceRolledYet,

    #[error("category {0} has already been used")]
    CategoryAlreadyUsed(Category),

    /// The configured per-turn roll limit is spent.
    #[error("no rolls left this turn (limit {limit}), choose a category")]
    NoRollsLeft { limit: u32 },

    /// Play commands after the last category was filled.
    #[error("the match is over, send RESTART to vote for a new one")]
    MatchOver,

    /// The match was ended early and accepts nothing more.
    #[error("the match has ended")]
    MatchAbandoned,

    /// `RESTART` while the match is still being played.
    #[error("RESTART is only accepted once the match is over")]
    RestartNotAllowed,

    /// A participant left; reported to the remaining players.
    #[error("player {} disconnected", .participant.0)]
    ParticipantDisconnected { participant: ParticipantId },

    /// The sender isn't seated in this match.
    #[error("player {} is not part of this match", .participant.0)]
    NotAParticipant { participant: ParticipantId },

    /// A rule-level refusal.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// The match actor has stopped and its channel is closed.
    #[error("the match is no longer running")]
    Unavailable,
}
