//! XOOX - tic-tac-toe against an AI with a best-times leaderboard
//!
//! Host-side pieces around [`xoox_engine`]: the SQLite score store, the
//! application configuration and the terminal front end.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod terminal;

// Crate-level exports - Configuration
pub use config::{AppConfig, ConfigError, DB_PATH_ENV};

// Crate-level exports - Persistence
pub use db::{DbError, NewScore, Score, ScoreRepository};

// Crate-level exports - Terminal
pub use terminal::{Input, parse_input, play, ranking, render_event, render_leaderboard, result_message};
