//! Error types for the rules layer.

use crate::{Category, ParticipantId};

/// Errors raised by rule-level mutators and parsers.
///
/// None of these ever leave the match in a half-updated state: every
/// mutator checks first and writes last.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    /// The category already holds a score on this participant's sheet.
    #[error("category {0} has already been used")]
    CategoryAlreadyUsed(Category),

    /// The name does not match any of the 13 scoring categories.
    #[error("unknown category: {0:?}")]
    UnknownCategory(String),

    /// A die face outside `1..=6`.
    #[error("invalid die face {0}, expected 1-6")]
    InvalidDie(u8),

    /// The participant index is not seated in this match.
    #[error("participant {0} is not part of this match")]
    UnknownParticipant(ParticipantId),
}
