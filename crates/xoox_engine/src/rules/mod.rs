//! Game rules for tic-tac-toe.
//!
//! Pure functions for evaluating a board. Rules are kept apart from board
//! storage so the controller and the search share one definition of a
//! terminal state.

mod draw;
mod win;

pub use draw::is_draw;
pub use win::{WinLine, check_winner, winning_line};

use crate::board::Board;
use crate::types::MatchResult;

/// Computes the terminal state of `board`.
///
/// Lines are checked rows first, then columns, then diagonals; the first
/// completed line decides the winner. A full board with no line is a draw.
pub fn evaluate(board: &Board) -> MatchResult {
    if let Some(player) = check_winner(board) {
        return MatchResult::Win(player);
    }
    if board.is_full() {
        MatchResult::Draw
    } else {
        MatchResult::InProgress
    }
}
