//! Command-line interface for xoox.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xoox_engine::Difficulty;

/// Xoox - tic-tac-toe against the computer in the terminal
#[derive(Parser, Debug)]
#[command(name = "xoox")]
#[command(about = "Play tic-tac-toe against an AI and chase the leaderboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./xoox.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the leaderboard database path
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a match against the AI
    Play {
        /// Player name recorded on the leaderboard
        #[arg(short, long)]
        name: String,

        /// AI difficulty: easy or hard
        #[arg(short, long, default_value = "easy")]
        difficulty: Difficulty,
    },

    /// Show the fastest wins
    Ranking {
        /// Number of rows to show (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
}
