//! The 3x3 board and move legality.

use crate::types::{Cell, Player};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Error returned when a move targets an out-of-range or occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum IllegalMoveError {
    /// Index is not in `0..9`.
    #[display("Cell {} is out of range (must be 0-8)", _0)]
    OutOfRange(#[error(not(source))] usize),
    /// Cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    Occupied(#[error(not(source))] usize),
}

/// 3x3 tic-tac-toe board.
///
/// Cells are indexed 0-8 in row-major order:
///
/// ```text
/// 0 1 2
/// 3 4 5
/// 6 7 8
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board from cells in row-major order.
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Gets the cell at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// True iff `index` is in range and the cell is empty.
    pub fn is_legal(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Returns a copy of this board with `player`'s mark at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalMoveError`] if the index is out of range or occupied.
    pub fn apply_move(&self, index: usize, player: Player) -> Result<Board, IllegalMoveError> {
        match self.get(index) {
            None => Err(IllegalMoveError::OutOfRange(index)),
            Some(Cell::Mark(_)) => Err(IllegalMoveError::Occupied(index)),
            Some(Cell::Empty) => {
                let mut next = *self;
                next.cells[index] = Cell::Mark(player);
                Ok(next)
            }
        }
    }

    /// Empty cell indices in ascending order.
    pub fn empty_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..CELL_COUNT).filter(|&index| self.cells[index] == Cell::Empty)
    }

    /// True when no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| *cell != Cell::Empty)
    }

    /// Places `player` at the empty cell `index`, runs `f`, then clears the cell again.
    ///
    /// The cell is restored before this returns, so search code can explore
    /// hypothetical moves on a single scratch board.
    pub(crate) fn with_mark<T>(
        &mut self,
        index: usize,
        player: Player,
        f: impl FnOnce(&mut Board) -> T,
    ) -> T {
        debug_assert!(self.is_legal(index), "hypothetical move on occupied cell");
        self.cells[index] = Cell::Mark(player);
        let out = f(self);
        self.cells[index] = Cell::Empty;
        out
    }
}

impl std::fmt::Display for Board {
    /// Renders three rows; empty cells show their 1-based number.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                match self.cells[index] {
                    Cell::Empty => write!(f, "{}", index + 1)?,
                    Cell::Mark(player) => write!(f, "{}", player)?,
                }
                if col < 2 {
                    write!(f, "|")?;
                }
            }
            if row < 2 {
                write!(f, "\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

/// Builds a board from a 9-character pattern of `X`, `O` and `.`.
#[cfg(test)]
pub(crate) fn board_from(pattern: &str) -> Board {
    let mut cells = [Cell::Empty; CELL_COUNT];
    for (index, ch) in pattern.chars().enumerate() {
        cells[index] = match ch {
            'X' => Cell::Mark(Player::X),
            'O' => Cell::Mark(Player::O),
            _ => Cell::Empty,
        };
    }
    Board::from_cells(cells)
}
