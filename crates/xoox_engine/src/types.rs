//! Core domain types for the match engine.

use serde::{Deserialize, Serialize};

/// A mark placed on the board.
///
/// `X` always belongs to the human and `O` to the AI; see [`Turn::mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Player {
    /// Player X (the human, moves first).
    X,
    /// Player O (the AI).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell holding a player's mark.
    Mark(Player),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Mark(player) => Some(player),
        }
    }
}

/// Whose turn it is within a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Turn {
    /// The human is to move.
    Human,
    /// The AI is to move.
    Ai,
}

impl Turn {
    /// Returns the mark this side plays. Fixed: human is `X`, AI is `O`.
    pub fn mark(self) -> Player {
        match self {
            Turn::Human => Player::X,
            Turn::Ai => Player::O,
        }
    }

    /// Returns the side that moves after this one.
    pub fn next(self) -> Self {
        match self {
            Turn::Human => Turn::Ai,
            Turn::Ai => Turn::Human,
        }
    }
}

/// AI difficulty tier.
///
/// Stored and parsed as `"easy"` / `"hard"`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// Random moves.
    Easy,
    /// Exhaustive minimax.
    Hard,
}

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    /// No line completed and at least one empty cell remains.
    InProgress,
    /// A player completed a line.
    Win(Player),
    /// Board is full with no completed line.
    Draw,
}

impl MatchResult {
    /// Returns true for `Win` and `Draw`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MatchResult::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            MatchResult::Win(player) => Some(*player),
            MatchResult::InProgress | MatchResult::Draw => None,
        }
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchResult::InProgress => write!(f, "In progress"),
            MatchResult::Win(player) => write!(f, "Player {} wins", player),
            MatchResult::Draw => write!(f, "Draw"),
        }
    }
}
