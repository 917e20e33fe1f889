use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dicepit::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Turn-based networked dice game server", long_about = None)]
struct Args {
    /// TOML config file. Missing keys take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding the config file.
    #[arg(short, long)]
    bind: Option<String>,

    /// Seed for reproducible dice, overriding the config file.
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig, DicepitError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Args::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("dice-server: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log);
    let config = config.validated();
    tracing::info!(bind = %config.bind, transport = ?config.transport, codec = ?config.codec, "starting");

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}
