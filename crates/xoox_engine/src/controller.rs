//! Turn alternation, the match clock and score reporting.
//!
//! [`MatchController`] is the single owner of [`MatchState`]. It is
//! synchronous: scheduling the AI's delayed reply and the clock ticks is the
//! job of [`crate::MatchRunner`], which drives the controller from one task.

use crate::board::Board;
use crate::config::MatchConfig;
use crate::rules::evaluate;
use crate::scores::ScoreStore;
use crate::strategy::{Strategy, strategy_for};
use crate::types::{Difficulty, MatchResult, Turn};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Coarse lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Moves and ticks are accepted.
    Ongoing,
    /// A result is in; the state is frozen until reset.
    Finished,
}

/// Snapshot of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MatchState {
    /// Current board.
    board: Board,
    /// Side to move.
    turn: Turn,
    /// AI difficulty.
    difficulty: Difficulty,
    /// Seconds counted by the match clock.
    elapsed_seconds: u32,
    /// Evaluation of the board.
    result: MatchResult,
}

impl MatchState {
    /// Initial state: empty board, human to move, clock at zero.
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            board: Board::new(),
            turn: Turn::Human,
            difficulty,
            elapsed_seconds: 0,
            result: MatchResult::InProgress,
        }
    }

    /// Derives the phase from the result.
    pub fn phase(&self) -> MatchPhase {
        if self.result.is_terminal() {
            MatchPhase::Finished
        } else {
            MatchPhase::Ongoing
        }
    }
}

/// What a controller operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed.
    Ignored,
    /// A move was applied and the match goes on; the other side is to move.
    Continued {
        /// Side that moved.
        mover: Turn,
        /// Cell that was marked.
        index: usize,
    },
    /// A move was applied and ended the match.
    Finished {
        /// Side that moved.
        mover: Turn,
        /// Cell that was marked.
        index: usize,
        /// Terminal result.
        result: MatchResult,
    },
}

/// Orchestrates one human against one AI strategy.
#[derive(Debug)]
pub struct MatchController {
    config: MatchConfig,
    state: MatchState,
    strategy: Box<dyn Strategy>,
    scores: Arc<dyn ScoreStore>,
    clock_running: bool,
    epoch: u64,
}

impl MatchController {
    /// Creates a controller using the strategy for the configured difficulty.
    #[instrument(skip(scores), fields(name = %config.name(), difficulty = %config.difficulty()))]
    pub fn new(config: MatchConfig, scores: Arc<dyn ScoreStore>) -> Self {
        let strategy = strategy_for(*config.difficulty());
        Self::with_strategy(config, strategy, scores)
    }

    /// Creates a controller with an explicit strategy.
    pub fn with_strategy(
        config: MatchConfig,
        strategy: Box<dyn Strategy>,
        scores: Arc<dyn ScoreStore>,
    ) -> Self {
        info!(
            name = %config.name(),
            difficulty = %config.difficulty(),
            strategy = ?strategy,
            "Match created"
        );
        Self {
            state: MatchState::new(*config.difficulty()),
            config,
            strategy,
            scores,
            clock_running: true,
            epoch: 0,
        }
    }

    /// Current match state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Match configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> MatchPhase {
        self.state.phase()
    }

    /// Whether the clock still counts.
    pub fn clock_running(&self) -> bool {
        self.clock_running
    }

    /// Generation counter, bumped by every [`reset`](Self::reset).
    ///
    /// Callbacks scheduled for an older epoch belong to a discarded match.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Plays the human's mark at `index`.
    ///
    /// Ignored when the match is finished, when it is the AI's turn, or when
    /// the cell is out of range or occupied.
    #[instrument(skip(self), fields(epoch = self.epoch))]
    pub fn submit_human_move(&mut self, index: usize) -> Transition {
        if self.phase() == MatchPhase::Finished {
            debug!("Match finished, human move ignored");
            return Transition::Ignored;
        }
        if self.state.turn != Turn::Human {
            debug!("Not the human's turn, move ignored");
            return Transition::Ignored;
        }
        match self.state.board.apply_move(index, Turn::Human.mark()) {
            Ok(board) => self.accept(board, Turn::Human, index),
            Err(e) => {
                debug!(error = %e, "Illegal human move ignored");
                Transition::Ignored
            }
        }
    }

    /// Lets the strategy play the AI's mark.
    ///
    /// Ignored unless the match is ongoing and it is the AI's turn. A selected
    /// cell that is already occupied is discarded without changing anything.
    #[instrument(skip(self), fields(epoch = self.epoch))]
    pub fn run_ai_turn(&mut self) -> Transition {
        if self.phase() == MatchPhase::Finished || self.state.turn != Turn::Ai {
            debug!(turn = %self.state.turn, "AI turn not due, ignored");
            return Transition::Ignored;
        }
        let Some(index) = self.strategy.select_move(&self.state.board) else {
            warn!("Strategy found no move on an ongoing board");
            return Transition::Ignored;
        };
        match self.state.board.apply_move(index, Turn::Ai.mark()) {
            Ok(board) => self.accept(board, Turn::Ai, index),
            Err(e) => {
                debug!(error = %e, "Stale AI move discarded");
                Transition::Ignored
            }
        }
    }

    /// Advances the clock by one second. Returns false once the match is over.
    pub fn tick(&mut self) -> bool {
        if !self.clock_running || self.phase() == MatchPhase::Finished {
            return false;
        }
        self.state.elapsed_seconds += 1;
        true
    }

    /// Discards the board and result and starts over.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.state = MatchState::new(*self.config.difficulty());
        self.clock_running = true;
        self.epoch += 1;
        info!(epoch = self.epoch, "Match reset");
    }

    fn accept(&mut self, board: Board, mover: Turn, index: usize) -> Transition {
        self.state.board = board;
        let result = evaluate(&board);
        debug!(mover = %mover, index, result = %result, "Move applied");

        if !result.is_terminal() {
            self.state.turn = mover.next();
            return Transition::Continued { mover, index };
        }

        self.state.result = result;
        self.clock_running = false;
        info!(
            result = %result,
            elapsed_seconds = self.state.elapsed_seconds,
            "Match finished"
        );

        if result == MatchResult::Win(Turn::Human.mark())
            && *self.config.difficulty() == Difficulty::Easy
        {
            self.report_score();
        }

        Transition::Finished {
            mover,
            index,
            result,
        }
    }

    fn report_score(&self) {
        let name = self.config.name();
        let difficulty = *self.config.difficulty();
        let time = self.state.elapsed_seconds;
        match self.scores.insert_score(name, difficulty, time) {
            Ok(()) => info!(name = %name, difficulty = %difficulty, time, "Score saved"),
            Err(e) => warn!(error = %e, name = %name, time, "Failed to save score"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::{InMemoryScoreStore, ScoreEntry, ScoreError};
    use crate::types::Player;
    use std::collections::VecDeque;

    /// Plays a fixed sequence of cells.
    #[derive(Debug)]
    struct Scripted(VecDeque<usize>);

    impl Strategy for Scripted {
        fn select_move(&mut self, _board: &Board) -> Option<usize> {
            self.0.pop_front()
        }

        fn difficulty(&self) -> Difficulty {
            Difficulty::Easy
        }
    }

    #[derive(Debug)]
    struct FailingStore;

    impl ScoreStore for FailingStore {
        fn insert_score(&self, _: &str, _: Difficulty, _: u32) -> Result<(), ScoreError> {
            Err(ScoreError::new("storage offline"))
        }

        fn top_scores(&self, _: usize) -> Result<Vec<ScoreEntry>, ScoreError> {
            Err(ScoreError::new("storage offline"))
        }
    }

    fn controller(
        difficulty: Difficulty,
        script: &[usize],
        store: Arc<dyn ScoreStore>,
    ) -> MatchController {
        let config = MatchConfig::new("Lucia", difficulty).unwrap();
        MatchController::with_strategy(config, Box::new(Scripted(script.iter().copied().collect())), store)
    }

    /// Human takes the top row while the AI plays 3 and 4.
    fn play_human_win(ctrl: &mut MatchController) -> Transition {
        ctrl.submit_human_move(0);
        ctrl.run_ai_turn();
        ctrl.submit_human_move(1);
        ctrl.run_ai_turn();
        ctrl.submit_human_move(2)
    }

    #[test]
    fn test_initial_state() {
        let ctrl = controller(Difficulty::Easy, &[], Arc::new(InMemoryScoreStore::new()));
        assert_eq!(ctrl.state(), &MatchState::new(Difficulty::Easy));
        assert_eq!(ctrl.phase(), MatchPhase::Ongoing);
        assert!(ctrl.clock_running());
    }

    #[test]
    fn test_turns_alternate() {
        let mut ctrl = controller(Difficulty::Easy, &[8], Arc::new(InMemoryScoreStore::new()));
        assert_eq!(
            ctrl.submit_human_move(4),
            Transition::Continued { mover: Turn::Human, index: 4 }
        );
        assert_eq!(*ctrl.state().turn(), Turn::Ai);
        assert_eq!(ctrl.submit_human_move(0), Transition::Ignored);
        assert_eq!(
            ctrl.run_ai_turn(),
            Transition::Continued { mover: Turn::Ai, index: 8 }
        );
        assert_eq!(*ctrl.state().turn(), Turn::Human);
        assert_eq!(ctrl.state().board().get(8).and_then(|c| c.mark()), Some(Player::O));
    }

    #[test]
    fn test_illegal_human_moves_ignored() {
        let mut ctrl = controller(Difficulty::Easy, &[0], Arc::new(InMemoryScoreStore::new()));
        assert_eq!(ctrl.submit_human_move(9), Transition::Ignored);
        ctrl.submit_human_move(4);
        ctrl.run_ai_turn();
        let before = ctrl.state().clone();
        assert_eq!(ctrl.submit_human_move(4), Transition::Ignored);
        assert_eq!(ctrl.submit_human_move(0), Transition::Ignored);
        assert_eq!(ctrl.state(), &before);
    }

    #[test]
    fn test_ai_turn_only_when_due() {
        let mut ctrl = controller(Difficulty::Easy, &[0], Arc::new(InMemoryScoreStore::new()));
        assert_eq!(ctrl.run_ai_turn(), Transition::Ignored);
        assert_eq!(ctrl.state().board(), &Board::new());
    }

    #[test]
    fn test_occupied_ai_choice_discarded() {
        let mut ctrl = controller(Difficulty::Easy, &[4], Arc::new(InMemoryScoreStore::new()));
        ctrl.submit_human_move(4);
        let before = ctrl.state().clone();
        assert_eq!(ctrl.run_ai_turn(), Transition::Ignored);
        assert_eq!(ctrl.state(), &before);
        assert_eq!(*ctrl.state().turn(), Turn::Ai);
    }

    #[test]
    fn test_easy_win_reports_score_once() {
        let store = InMemoryScoreStore::new();
        let mut ctrl = controller(Difficulty::Easy, &[3, 4], Arc::new(store.clone()));
        for _ in 0..42 {
            assert!(ctrl.tick());
        }
        let transition = play_human_win(&mut ctrl);
        assert_eq!(
            transition,
            Transition::Finished {
                mover: Turn::Human,
                index: 2,
                result: MatchResult::Win(Player::X),
            }
        );
        assert_eq!(
            store.entries().unwrap(),
            vec![ScoreEntry::new("Lucia".to_string(), Difficulty::Easy, 42)]
        );

        // Finished matches ignore further input.
        assert_eq!(ctrl.submit_human_move(5), Transition::Ignored);
        assert_eq!(ctrl.run_ai_turn(), Transition::Ignored);
        assert_eq!(store.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_hard_win_not_reported() {
        let store = InMemoryScoreStore::new();
        let mut ctrl = controller(Difficulty::Hard, &[3, 4], Arc::new(store.clone()));
        ctrl.tick();
        assert!(matches!(play_human_win(&mut ctrl), Transition::Finished { .. }));
        assert!(store.entries().unwrap().is_empty());
    }

    #[test]
    fn test_ai_win_not_reported() {
        let store = InMemoryScoreStore::new();
        let mut ctrl = controller(Difficulty::Easy, &[3, 4, 5], Arc::new(store.clone()));
        ctrl.submit_human_move(0);
        ctrl.run_ai_turn();
        ctrl.submit_human_move(1);
        ctrl.run_ai_turn();
        ctrl.submit_human_move(8);
        assert_eq!(
            ctrl.run_ai_turn(),
            Transition::Finished {
                mover: Turn::Ai,
                index: 5,
                result: MatchResult::Win(Player::O),
            }
        );
        assert!(store.entries().unwrap().is_empty());
    }

    #[test]
    fn test_draw_finishes_without_report() {
        let store = InMemoryScoreStore::new();
        // X: 0 2 3 7 8, O: 1 4 5 6 -> no line.
        let mut ctrl = controller(Difficulty::Easy, &[1, 4, 5, 6], Arc::new(store.clone()));
        for human in [0, 2, 3, 7] {
            ctrl.submit_human_move(human);
            ctrl.run_ai_turn();
        }
        assert_eq!(
            ctrl.submit_human_move(8),
            Transition::Finished {
                mover: Turn::Human,
                index: 8,
                result: MatchResult::Draw,
            }
        );
        assert!(store.entries().unwrap().is_empty());
    }

    #[test]
    fn test_store_failure_is_not_fatal() {
        let mut ctrl = controller(Difficulty::Easy, &[3, 4], Arc::new(FailingStore));
        assert!(matches!(play_human_win(&mut ctrl), Transition::Finished { .. }));
        assert_eq!(ctrl.phase(), MatchPhase::Finished);
        assert_eq!(*ctrl.state().result(), MatchResult::Win(Player::X));
    }

    #[test]
    fn test_clock_stops_on_finish() {
        let mut ctrl = controller(Difficulty::Easy, &[3, 4], Arc::new(InMemoryScoreStore::new()));
        ctrl.tick();
        ctrl.tick();
        play_human_win(&mut ctrl);
        assert!(!ctrl.clock_running());
        assert!(!ctrl.tick());
        assert_eq!(*ctrl.state().elapsed_seconds(), 2);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut ctrl = controller(Difficulty::Hard, &[3, 4], Arc::new(InMemoryScoreStore::new()));
        ctrl.tick();
        play_human_win(&mut ctrl);
        let epoch = ctrl.epoch();

        ctrl.reset();
        let once = ctrl.state().clone();
        assert_eq!(once, MatchState::new(Difficulty::Hard));
        assert!(ctrl.clock_running());
        assert_eq!(ctrl.epoch(), epoch + 1);

        ctrl.reset();
        assert_eq!(ctrl.state(), &once);
    }
}
