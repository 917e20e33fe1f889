//! The match coordinator for Dicepit.
//!
//! A match runs as an isolated Tokio task (actor model) that exclusively
//! owns its [`MatchState`](dicepit_rules::MatchState). Every command from
//! every connection is funnelled through one channel, so commands are
//! applied strictly one at a time and the events a command produces are
//! queued to all recipients before the next command is looked at.
//!
//! # Key types
//!
//! - [`MatchCoordinator`]: the synchronous turn state machine
//! - [`MatchHandle`]: send commands to a running match actor
//! - [`Phase`]: where the match is in its turn cycle
//! - [`MatchConfig`]: seat count, roll limit, dice visibility

mod actor;
mod config;
mod coordinator;
mod error;

pub use actor::{EventSender, MatchHandle, MatchId, MatchInfo, spawn_match};
pub use config::{MatchConfig, Phase};
pub use coordinator::{MatchCoordinator, Outbound};
pub use error::MatchError;
