//! XOOX engine - single-player tic-tac-toe against an AI
//!
//! A UI-agnostic match engine with two difficulty tiers and a best-times
//! hook for a leaderboard.
//!
//! # Architecture
//!
//! - **Board**: fixed 3x3 grid with move legality
//! - **Rules**: pure win/draw evaluation
//! - **Strategy**: random (easy) and exhaustive minimax (hard) move selection
//! - **Controller**: turn alternation, match clock, score reporting
//! - **Runner**: async owner of a controller with cancellable timers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use xoox_engine::{Difficulty, InMemoryScoreStore, MatchConfig, MatchController, Transition};
//!
//! let config = MatchConfig::new("Lucia", Difficulty::Hard)?;
//! let mut controller = MatchController::new(config, Arc::new(InMemoryScoreStore::new()));
//!
//! controller.submit_human_move(4);
//! assert!(matches!(controller.run_ai_turn(), Transition::Continued { .. }));
//! # Ok::<(), xoox_engine::MatchConfigError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod config;
mod controller;
mod rules;
mod runner;
mod scores;
mod strategy;
mod timer;
mod types;

// Crate-level exports - Board and domain types
pub use board::{Board, CELL_COUNT, IllegalMoveError};
pub use types::{Cell, Difficulty, MatchResult, Player, Turn};

// Crate-level exports - Rules
pub use rules::{WinLine, check_winner, evaluate, is_draw, winning_line};

// Crate-level exports - AI strategies
pub use strategy::{MinimaxStrategy, RandomStrategy, Strategy, WIN_SCORE, minimax, strategy_for};

// Crate-level exports - Match control
pub use config::{DEFAULT_AI_DELAY, DEFAULT_TICK, MatchConfig, MatchConfigError, MatchTiming};
pub use controller::{MatchController, MatchPhase, MatchState, Transition};
pub use runner::{MatchEvent, MatchHandle, MatchRunner, RunnerError};
pub use timer::TimerHandle;

// Crate-level exports - Score reporting
pub use scores::{InMemoryScoreStore, ScoreEntry, ScoreError, ScoreStore};
