//! AI move selection, one strategy per difficulty.

mod minimax;
mod random;

pub use minimax::{MinimaxStrategy, WIN_SCORE, minimax};
pub use random::RandomStrategy;

use crate::board::Board;
use crate::types::Difficulty;
use tracing::instrument;

/// A move-selection policy for the AI.
pub trait Strategy: std::fmt::Debug + Send {
    /// Chooses a cell for the AI's mark.
    ///
    /// Callers pass a board that is still in progress. The returned index is
    /// always legal on `board`; `None` means the board has no empty cell.
    fn select_move(&mut self, board: &Board) -> Option<usize>;

    /// The difficulty tier this strategy implements.
    fn difficulty(&self) -> Difficulty;
}

/// Returns the strategy for a difficulty tier.
#[instrument]
pub fn strategy_for(difficulty: Difficulty) -> Box<dyn Strategy> {
    match difficulty {
        Difficulty::Easy => Box::new(RandomStrategy::new()),
        Difficulty::Hard => Box::new(MinimaxStrategy::new()),
    }
}
