//! Participant registry and match lifecycle for Dicepit.
//!
//! This crate sits between the connection handlers and the match actor:
//!
//! 1. **Admission**: a new connection takes the lowest free seat, or is
//!    refused when every seat is taken ([`SessionRegistry::admit`])
//! 2. **Lobby**: a background task waits until every seat is filled, then
//!    spawns a fresh match with the full roster ([`run_lobby`])
//! 3. **Departure**: a leaving participant frees their seat, the live
//!    match is told, and the registry goes back to waiting ([`release`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (above)          ← one handler per connection
//!     ↕
//! Session Layer (this)    ← seats, lobby, match start/stop
//!     ↕
//! Match Layer (below)     ← MatchHandle, turn state machine
//! ```
//!
//! There is no authentication and no reconnection: a participant is a
//! seat held by one live connection.

mod error;
mod lobby;
mod registry;

pub use error::SessionError;
pub use lobby::{release, run_lobby};
pub use registry::{RosterStatus, SessionRegistry};
