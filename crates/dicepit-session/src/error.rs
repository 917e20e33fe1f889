//! Error types for the session layer.

use dicepit_rules::ParticipantId;

/// Errors from seat management.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Every seat is taken, or a match is being played.
    #[error("Server is full")]
    Full { capacity: usize },

    /// No participant holds this seat.
    #[error("no participant in seat {}", .participant.0)]
    NotFound { participant: ParticipantId },

    /// A match can't start until every seat is filled and no match is
    /// running.
    #[error("not ready to start a match ({seated}/{capacity} seated)")]
    NotReady { seated: usize, capacity: usize },
}
