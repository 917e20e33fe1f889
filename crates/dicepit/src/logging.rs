//! Structured logging setup via `tracing-subscriber`.
//!
//! The filter comes from the `DICEPIT_LOG` environment variable when set,
//! else from the config's `log.level`, else `info`.

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogConfig, LogFormat};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "DICEPIT_LOG";

/// Installs the global subscriber. Call once, from the binary.
///
/// Returns `false` if a subscriber was already installed.
pub fn init_tracing(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match config.format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(true)
            .try_init(),
        LogFormat::Text => fmt().with_env_filter(filter).with_target(true).try_init(),
    };
    result.is_ok()
}
