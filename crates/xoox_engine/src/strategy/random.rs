//! Easy AI: a uniformly random empty cell.

use super::Strategy;
use crate::board::Board;
use crate::types::Difficulty;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tracing::{debug, instrument};

/// Picks any empty cell with equal probability. No look-ahead.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    /// Creates a strategy seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a strategy with a fixed seed, for reproducible games.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomStrategy {
    #[instrument(skip_all)]
    fn select_move(&mut self, board: &Board) -> Option<usize> {
        let empty: Vec<usize> = board.empty_indices().collect();
        let choice = empty.choose(&mut self.rng).copied();
        debug!(candidates = empty.len(), choice = ?choice, "Random move selected");
        choice
    }

    fn difficulty(&self) -> Difficulty {
        Difficulty::Easy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::board_from;
    use crate::types::Player;
    use std::collections::HashSet;

    #[test]
    fn test_always_picks_empty_cell() {
        let mut strategy = RandomStrategy::with_seed(7);
        let board = board_from("XO.OX.X.O");
        for _ in 0..100 {
            let index = strategy.select_move(&board).unwrap();
            assert!(board.is_legal(index), "picked occupied cell {}", index);
        }
    }

    #[test]
    fn test_single_empty_cell() {
        let mut strategy = RandomStrategy::with_seed(1);
        let board = board_from("XOXOXOOX.");
        assert_eq!(strategy.select_move(&board), Some(8));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let mut strategy = RandomStrategy::with_seed(1);
        assert_eq!(strategy.select_move(&board_from("XOXOXOOXO")), None);
    }

    #[test]
    fn test_covers_all_empty_cells() {
        let mut strategy = RandomStrategy::with_seed(42);
        let board = Board::new().apply_move(4, Player::X).unwrap();
        let seen: HashSet<usize> = (0..500)
            .filter_map(|_| strategy.select_move(&board))
            .collect();
        assert_eq!(seen.len(), 8);
        assert!(!seen.contains(&4));
    }

    #[test]
    fn test_seeded_strategies_agree() {
        let board = Board::new();
        let mut a = RandomStrategy::with_seed(99);
        let mut b = RandomStrategy::with_seed(99);
        for _ in 0..20 {
            assert_eq!(a.select_move(&board), b.select_move(&board));
        }
    }
}
