//! Unified error type for the Dicepit server.

use dicepit_match::MatchError;
use dicepit_protocol::ProtocolError;
use dicepit_session::SessionError;
use dicepit_transport::TransportError;

use crate::config::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant lets `?` convert sub-crate
/// errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum DicepitError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A line that couldn't be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Seat management failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The match actor refused or is gone.
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::LineTooLong { limit: 16 };
        let dicepit_err: DicepitError = err.into();
        assert!(matches!(dicepit_err, DicepitError::Transport(_)));
        assert!(dicepit_err.to_string().contains("16"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::UnknownCommand("JUMP".into());
        let dicepit_err: DicepitError = err.into();
        assert!(matches!(dicepit_err, DicepitError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let dicepit_err: DicepitError = SessionError::Full { capacity: 2 }.into();
        assert_eq!(dicepit_err.to_string(), "Server is full");
    }

    #[test]
    fn test_from_match_error() {
        let dicepit_err: DicepitError = MatchError::Unavailable.into();
        assert!(matches!(dicepit_err, DicepitError::Match(_)));
    }
}
