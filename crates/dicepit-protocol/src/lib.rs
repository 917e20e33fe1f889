//! Wire protocol for Dicepit.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`Command`], [`Event`], [`Recipient`]): what a line means.
//! - **Codecs** ([`Codec`] trait, [`TextCodec`], [`JsonCodec`]): how a
//!   line is turned into a typed value and back.
//! - **Errors** ([`ProtocolError`]): what can go wrong while decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw lines) and the match
//! coordinator (typed commands). It holds no state and knows nothing about
//! turns or connections.
//!
//! ```text
//! Transport (lines) → Protocol (Command / Event) → Match Coordinator
//! ```

mod codec;
mod error;
mod text;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use text::TextCodec;
pub use types::{Command, Event, Recipient};
