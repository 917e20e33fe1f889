//! # Dicepit
//!
//! A server for a turn-based dice game played over persistent line-based
//! connections.
//!
//! Participants connect over TCP (or WebSocket), take a seat, and once
//! every seat is filled a match starts. A single match actor applies
//! commands one at a time; everything a command produces reaches every
//! recipient before the next command is considered.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dicepit::prelude::*;
//!
//! # async fn run() -> Result<(), DicepitError> {
//! let config = ServerConfig::load(std::path::Path::new("dicepit.toml"))?.validated();
//! init_tracing(&config.log);
//! serve(config).await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod logging;
mod server;

pub use config::{
    CodecKind, ConfigError, LogConfig, LogFormat, PLAYER_RANGE, ServerConfig, TransportKind,
};
pub use error::DicepitError;
pub use logging::{LOG_ENV, init_tracing};
pub use server::{DicepitServer, DicepitServerBuilder, serve};

/// Re-exports for building and running a server.
pub mod prelude {
    pub use crate::{
        CodecKind, DicepitError, DicepitServer, DicepitServerBuilder, ServerConfig,
        TransportKind, init_tracing, serve,
    };
    pub use dicepit_match::MatchConfig;
}
