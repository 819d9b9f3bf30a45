//! End-to-end match scenarios through the controller.

use std::sync::Arc;

use xoox_engine::{
    Board, Cell, Difficulty, InMemoryScoreStore, MatchConfig, MatchController, MatchPhase,
    MatchResult, Player, ScoreEntry, Strategy, Transition, Turn, evaluate, minimax,
};

/// Plays a fixed sequence of cells.
#[derive(Debug)]
struct Scripted(Vec<usize>);

impl Strategy for Scripted {
    fn select_move(&mut self, _board: &Board) -> Option<usize> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.remove(0))
        }
    }

    fn difficulty(&self) -> Difficulty {
        Difficulty::Easy
    }
}

fn cells(pattern: &str) -> Board {
    let mut cells = [Cell::Empty; 9];
    for (index, ch) in pattern.chars().enumerate() {
        cells[index] = match ch {
            'X' => Cell::Mark(Player::X),
            'O' => Cell::Mark(Player::O),
            _ => Cell::Empty,
        };
    }
    Board::from_cells(cells)
}

/// Best human reply: lowest minimax score for the AI, lowest index on ties.
fn optimal_human_move(board: &Board) -> usize {
    let mut best: Option<(usize, i32)> = None;
    for index in board.empty_indices() {
        let mut next = board.apply_move(index, Player::X).expect("Legal move");
        let score = minimax(&mut next, true);
        if best.is_none_or(|(_, s)| score < s) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index).expect("Board has an empty cell")
}

#[test]
fn test_center_opening_against_hard_ai_draws() {
    let config = MatchConfig::new("Lucia", Difficulty::Hard).expect("Valid config");
    let store = InMemoryScoreStore::new();
    let mut ctrl = MatchController::new(config, Arc::new(store.clone()));

    ctrl.submit_human_move(4);
    assert!(matches!(ctrl.run_ai_turn(), Transition::Continued { mover: Turn::Ai, .. }));

    while ctrl.phase() == MatchPhase::Ongoing {
        let index = optimal_human_move(ctrl.state().board());
        if let Transition::Continued { .. } = ctrl.submit_human_move(index) {
            ctrl.run_ai_turn();
        }
    }

    assert_eq!(*ctrl.state().result(), MatchResult::Draw);
    assert!(store.entries().expect("Store readable").is_empty());
}

#[test]
fn test_completing_top_row_wins() {
    let board = cells("XX.OO....");
    let board = board.apply_move(2, Player::X).expect("Cell 2 is empty");
    assert_eq!(evaluate(&board), MatchResult::Win(Player::X));
}

#[test]
fn test_full_board_without_line_draws() {
    assert_eq!(evaluate(&cells("XOXOXOOXO")), MatchResult::Draw);
}

#[test]
fn test_easy_win_at_42_seconds_reports_once() {
    let store = InMemoryScoreStore::new();
    let config = MatchConfig::new("Lucia", Difficulty::Easy).expect("Valid config");
    let mut ctrl =
        MatchController::with_strategy(config, Box::new(Scripted(vec![3, 4])), Arc::new(store.clone()));

    for _ in 0..42 {
        ctrl.tick();
    }
    for index in [0, 1] {
        ctrl.submit_human_move(index);
        ctrl.run_ai_turn();
    }
    ctrl.submit_human_move(2);

    assert_eq!(*ctrl.state().result(), MatchResult::Win(Player::X));
    assert_eq!(
        store.entries().expect("Store readable"),
        vec![ScoreEntry::new("Lucia".to_string(), Difficulty::Easy, 42)]
    );
}

#[test]
fn test_hard_win_reports_nothing() {
    let store = InMemoryScoreStore::new();
    let config = MatchConfig::new("Lucia", Difficulty::Hard).expect("Valid config");
    let mut ctrl =
        MatchController::with_strategy(config, Box::new(Scripted(vec![3, 4])), Arc::new(store.clone()));

    for _ in 0..42 {
        ctrl.tick();
    }
    for index in [0, 1] {
        ctrl.submit_human_move(index);
        ctrl.run_ai_turn();
    }
    ctrl.submit_human_move(2);

    assert_eq!(*ctrl.state().result(), MatchResult::Win(Player::X));
    assert!(store.entries().expect("Store readable").is_empty());
}

#[test]
fn test_easy_ai_only_plays_empty_cells() {
    let config = MatchConfig::new("Lucia", Difficulty::Easy).expect("Valid config");
    let mut ctrl = MatchController::new(config, Arc::new(InMemoryScoreStore::new()));

    for _ in 0..5 {
        while ctrl.phase() == MatchPhase::Ongoing {
            let board = *ctrl.state().board();
            let index = board.empty_indices().next().expect("Ongoing board has space");
            ctrl.submit_human_move(index);
            let before = *ctrl.state().board();
            if let Transition::Continued { index, .. } | Transition::Finished { index, .. } =
                ctrl.run_ai_turn()
            {
                assert!(before.is_legal(index));
            }
        }
        ctrl.reset();
    }
}
