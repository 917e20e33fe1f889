//! Game rules for Dicepit.
//!
//! This crate is the leaf of the workspace. It knows nothing about
//! sockets, lines or tasks: only dice, categories and scores:
//!
//! - **Scoring** ([`score`]): a pure function from a [`Category`] and a
//!   [`Dice`] hand to points.
//! - **Score sheets** ([`ScoreSheet`]): write-once category → score tables.
//! - **Match state** ([`MatchState`]): turn order, rounds, the current
//!   hand of every participant and their sheets.
//!
//! # How it fits in the stack
//!
//! ```text
//! Match Coordinator (above)  ← validates commands, then mutates MatchState
//!     ↕
//! Rules (this crate)  ← scoring, sheets, dice, turn counters
//! ```

mod category;
mod dice;
mod error;
mod scoring;
mod sheet;
mod state;

pub use category::{Category, Section};
pub use dice::{DICE_COUNT, Dice, DiceSource, HoldMask, RandomDice, SequenceDice};
pub use error::RulesError;
pub use scoring::{
    FULL_HOUSE_SCORE, LARGE_STRAIGHT_SCORE, SMALL_STRAIGHT_SCORE,
    UPPER_BONUS, UPPER_BONUS_THRESHOLD, YAHTZEE_SCORE, score,
};
pub use sheet::ScoreSheet;
pub use state::{MatchState, Outcome, ParticipantId, Standing};
