//! Win detection.

use crate::board::Board;
use crate::types::{Cell, Player};

/// One of the eight index triples that wins the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WinLine([usize; 3]);

impl WinLine {
    /// All lines in evaluation order: rows, columns, diagonals.
    pub const ALL: [WinLine; 8] = [
        // Rows
        WinLine([0, 1, 2]),
        WinLine([3, 4, 5]),
        WinLine([6, 7, 8]),
        // Columns
        WinLine([0, 3, 6]),
        WinLine([1, 4, 7]),
        WinLine([2, 5, 8]),
        // Diagonals
        WinLine([0, 4, 8]),
        WinLine([2, 4, 6]),
    ];

    /// The three cell indices of this line.
    pub fn cells(&self) -> [usize; 3] {
        self.0
    }

    /// Returns the player holding all three cells, if any.
    pub fn owner(&self, board: &Board) -> Option<Player> {
        let [a, b, c] = self.0;
        match board.get(a) {
            Some(Cell::Mark(player))
                if board.get(b) == Some(Cell::Mark(player))
                    && board.get(c) == Some(Cell::Mark(player)) =>
            {
                Some(player)
            }
            _ => None,
        }
    }
}

/// Returns the first completed line on the board.
pub fn winning_line(board: &Board) -> Option<WinLine> {
    WinLine::ALL
        .iter()
        .copied()
        .find(|line| line.owner(board).is_some())
}

/// Returns the player who completed a line, if any.
pub fn check_winner(board: &Board) -> Option<Player> {
    WinLine::ALL.iter().find_map(|line| line.owner(board))
}
