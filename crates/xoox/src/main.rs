//! XOOX - Terminal tic-tac-toe
//!
//! Play against the AI or browse the fastest wins.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use xoox::AppConfig;
use xoox_engine::{Difficulty, MatchConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?.with_db_path(cli.db_path);

    // Logs go to stderr so they never interleave with the board on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Play { name, difficulty } => run_play(&config, name, difficulty).await,
        Command::Ranking { limit } => {
            let limit = limit.unwrap_or(*config.leaderboard_limit());
            xoox::ranking(&config, limit)
        }
    }
}

/// Run an interactive match
#[instrument(skip(config))]
async fn run_play(config: &AppConfig, name: String, difficulty: Difficulty) -> Result<()> {
    let match_config = MatchConfig::new(&name, difficulty)?;
    info!(db_path = %config.db_path(), "Starting match");
    xoox::play(config, match_config).await
}
