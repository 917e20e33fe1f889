//! Server configuration.
//!
//! Loaded from an optional TOML file at startup. Every field has a
//! default, so the server runs without any file at all:
//!
//! ```toml
//! bind = "0.0.0.0:12345"
//! transport = "tcp"        # or "websocket"
//! codec = "text"           # or "json"
//! seed = 42                # optional, reproducible dice
//!
//! [match]
//! players = 2
//! max_rolls_per_turn = 0   # 0 = unlimited
//! share_dice = false
//!
//! [log]
//! level = "info"
//! format = "text"          # or "json"
//! ```

use std::path::{Path, PathBuf};

use dicepit_match::MatchConfig;
use serde::{Deserialize, Serialize};

/// Smallest and largest seat count a server accepts.
pub const PLAYER_RANGE: std::ops::RangeInclusive<usize> = 1..=8;

/// Errors from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Which listener to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Newline-delimited TCP.
    #[default]
    Tcp,
    /// One WebSocket text frame per line.
    WebSocket,
}

/// Which line encoding to speak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    /// `KEYWORD:payload` lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings. `DICEPIT_LOG` overrides `level` when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// An `EnvFilter` directive, e.g. `info` or `dicepit_match=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Text,
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: String,
    pub transport: TransportKind,
    pub codec: CodecKind,
    /// Seeds the dice. Match `n` (from 0) uses `seed + n`.
    pub seed: Option<u64>,
    #[serde(rename = "match")]
    pub match_config: MatchConfig,
    pub log: LogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:12345".into(),
            transport: TransportKind::default(),
            codec: CodecKind::default(),
            seed: None,
            match_config: MatchConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads and parses a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Clamps values the server can't run with into range.
    pub fn validated(mut self) -> Self {
        let players = self.match_config.players;
        let clamped = players.clamp(*PLAYER_RANGE.start(), *PLAYER_RANGE.end());
        if clamped != players {
            tracing::warn!(players, clamped, "player count out of range, clamping");
            self.match_config.players = clamped;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind, "127.0.0.1:12345");
        assert_eq!(config.match_config.players, 2);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            transport = "websocket"
            codec = "json"
            seed = 7

            [match]
            players = 3
            share_dice = true

            [log]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.transport, TransportKind::WebSocket);
        assert_eq!(config.codec, CodecKind::Json);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.match_config.players, 3);
        assert!(config.match_config.share_dice);
        assert_eq!(config.match_config.max_rolls_per_turn, 0);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_unknown_transport_is_rejected() {
        let result: Result<ServerConfig, _> = toml::from_str(r#"transport = "quic""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validated_clamps_players() {
        let mut config = ServerConfig::default();
        config.match_config.players = 0;
        assert_eq!(config.validated().match_config.players, 1);

        let mut config = ServerConfig::default();
        config.match_config.players = 40;
        assert_eq!(config.validated().match_config.players, 8);
    }

    #[test]
    fn test_load_reports_path() {
        let err = ServerConfig::load(Path::new("/nonexistent/dicepit.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dicepit.toml"));
    }
}
