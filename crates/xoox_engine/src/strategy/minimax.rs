//! Hard AI: exhaustive minimax search without pruning.
//!
//! Scores are not depth-adjusted. A win found several plies away scores the
//! same as an immediate one, and among equal scores the lowest cell index
//! wins (strict `>` when updating the best move). The AI therefore always
//! reaches an optimal outcome but not necessarily the fastest one.

use super::Strategy;
use crate::board::{Board, CELL_COUNT};
use crate::rules::evaluate;
use crate::types::{Difficulty, MatchResult, Turn};
use tracing::{debug, instrument};

/// Score of a position the AI has won. A human win scores the negation.
pub const WIN_SCORE: i32 = 10;

/// Minimax value of `board` from the AI's point of view.
///
/// `maximizing` is true when the AI is to move. Hypothetical marks are placed
/// in place and removed again, so `board` is unchanged on return.
pub fn minimax(board: &mut Board, maximizing: bool) -> i32 {
    match evaluate(board) {
        MatchResult::Win(player) if player == Turn::Ai.mark() => return WIN_SCORE,
        MatchResult::Win(_) => return -WIN_SCORE,
        MatchResult::Draw => return 0,
        MatchResult::InProgress => {}
    }

    let (mark, mut best) = if maximizing {
        (Turn::Ai.mark(), i32::MIN)
    } else {
        (Turn::Human.mark(), i32::MAX)
    };

    for index in 0..CELL_COUNT {
        if !board.is_legal(index) {
            continue;
        }
        let score = board.with_mark(index, mark, |b| minimax(b, !maximizing));
        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }

    best
}

/// Plays the move with the highest minimax score.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimaxStrategy;

impl MinimaxStrategy {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self
    }

    /// Scores every empty cell as the AI's next move, in ascending index order.
    pub fn score_moves(&self, board: &Board) -> Vec<(usize, i32)> {
        let mut scratch = *board;
        (0..CELL_COUNT)
            .filter(|&index| board.is_legal(index))
            .map(|index| {
                let score = scratch.with_mark(index, Turn::Ai.mark(), |b| minimax(b, false));
                (index, score)
            })
            .collect()
    }
}

impl Strategy for MinimaxStrategy {
    #[instrument(skip_all)]
    fn select_move(&mut self, board: &Board) -> Option<usize> {
        let mut best: Option<(usize, i32)> = None;
        for (index, score) in self.score_moves(board) {
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }
        debug!(choice = ?best, "Minimax move selected");
        best.map(|(index, _)| index)
    }

    fn difficulty(&self) -> Difficulty {
        Difficulty::Hard
    }
}
