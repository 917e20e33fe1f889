//! Core protocol types.
//!
//! These are the values that travel "on the wire", one per line. The
//! text grammar for each lives in [`crate::TextCodec`]; the same values
//! also serialize with serde for [`crate::JsonCodec`].

use dicepit_rules::{Category, Dice, HoldMask, ParticipantId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// A decoded client command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// `ROLL` or `ROLL:<i0>,<i1>,...`: reroll everything except the held
    /// positions.
    Roll { hold: HoldMask },

    /// `MOVE:<category>:<d1 d2 d3 d4 d5>:<row>:<col>`: commit a score.
    ///
    /// `dice` is the client's echo of its hand. It is kept for auditing
    /// only; the score is always computed from the server's own dice.
    /// `row`/`col` are client display coordinates, echoed back verbatim.
    Move {
        category: Category,
        dice: Dice,
        row: u32,
        col: u32,
    },

    /// `RESTART`: one vote for a new match.
    Restart,

    /// `QUIT`: voluntary disconnect.
    Quit,
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// An event sent from the server to one or more clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// `INDEX:<id>`: the receiving connection's participant id.
    Index { participant: ParticipantId },

    /// `INFO:<text>`: a human-readable notice.
    Info { text: String },

    /// `DICE:<d1> <d2> <d3> <d4> <d5>`: the roller's current hand.
    Dice { dice: Dice },

    /// `TURN:<id>`: whose turn is now active.
    Turn { participant: ParticipantId },

    /// `SCORE:<row>,<col>,<score>`: a committed score.
    Score { row: u32, col: u32, score: u32 },

    /// `GAME_OVER_SUMMARY:`: the `INFO:` lines that follow are the final
    /// standings.
    GameOverSummary,
}

impl Event {
    /// Shorthand for an `INFO:` event.
    pub fn info(text: impl Into<String>) -> Self {
        Self::Info { text: text.into() }
    }
}

// ---------------------------------------------------------------------------
// Recipient: who should receive an event?
// ---------------------------------------------------------------------------

/// Specifies who should receive a server event.
///
/// When the coordinator processes a command, it returns a list of
/// `(Recipient, Event)` pairs; the actor uses this to fan events out to
/// the right connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every participant still in the match.
    All,

    /// One specific participant.
    Participant(ParticipantId),
}
