//! Draw detection.

use super::win::check_winner;
use crate::board::Board;

/// A draw is a full board with no completed line.
pub fn is_draw(board: &Board) -> bool {
    board.is_full() && check_winner(board).is_none()
}
