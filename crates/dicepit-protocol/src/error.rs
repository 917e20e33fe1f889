//! Error types for the protocol layer.
//!
//! Every decoding failure is explicit. A malformed number never turns
//! into a default value that lets a command proceed.

use dicepit_rules::RulesError;

/// Errors that can occur while translating lines.
///
/// The `Display` text of each variant is what the offending client sees
/// after `INFO:`, so messages are written for players, not developers.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The line is empty or doesn't follow the grammar of its keyword.
    #[error("malformed command: {0}")]
    Malformed(String),

    /// The keyword isn't one of ROLL, MOVE, RESTART, QUIT.
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    /// A numeric field didn't parse.
    #[error("invalid {field}: {value:?} is not a valid number")]
    InvalidNumber { field: &'static str, value: String },

    /// The category name isn't one of the 13 categories.
    #[error("invalid category: {0:?}")]
    InvalidCategory(String),

    /// The echoed dice aren't five faces in 1-6.
    #[error("invalid dice: {0}")]
    InvalidDice(RulesError),

    /// The line is a well-formed server event of unknown kind.
    #[error("unknown event: {0:?}")]
    UnknownEvent(String),

    /// JSON encoding failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// JSON decoding failed.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
