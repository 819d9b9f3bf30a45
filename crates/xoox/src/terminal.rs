//! Line-oriented terminal front end.
//!
//! Reads one command per line from stdin while rendering [`MatchEvent`]s
//! from the runner. Cells are numbered 1 to 9, left to right, top to bottom.

use crate::config::AppConfig;
use crate::db::ScoreRepository;
use anyhow::Result;
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument};
use xoox_engine::{
    MatchConfig, MatchController, MatchEvent, MatchResult, MatchRunner, Player,
    ScoreEntry, ScoreStore, Turn,
};

const HELP: &str = "Enter 1-9 to mark a cell, r to restart, q to quit.";

/// A parsed line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Mark the cell at this zero-based index.
    Move(usize),
    /// Start over.
    Reset,
    /// Leave the game.
    Quit,
    /// Anything else.
    Unknown,
}

/// Parses a line typed by the player.
pub fn parse_input(line: &str) -> Input {
    match line.trim() {
        "r" | "R" | "reset" => Input::Reset,
        "q" | "Q" | "quit" | "exit" => Input::Quit,
        other => match other.parse::<usize>() {
            Ok(cell @ 1..=9) => Input::Move(cell - 1),
            _ => Input::Unknown,
        },
    }
}

/// Text shown when a match ends.
pub fn result_message(result: MatchResult, elapsed_seconds: u32) -> String {
    match result {
        MatchResult::Win(Player::X) => format!("You win in {}s!", elapsed_seconds),
        MatchResult::Win(Player::O) => format!("You lose after {}s.", elapsed_seconds),
        MatchResult::Draw => format!("Draw after {}s.", elapsed_seconds),
        MatchResult::InProgress => String::new(),
    }
}

/// Renders an event as terminal text. Clock ticks render nothing.
pub fn render_event(event: &MatchEvent) -> Option<String> {
    match event {
        MatchEvent::Started(state) => Some(format!(
            "New match on {} difficulty. You are X.\n{}\n{}",
            state.difficulty(),
            state.board(),
            HELP
        )),
        MatchEvent::MoveApplied {
            mover: Turn::Human,
            board,
            ..
        } => Some(board.to_string()),
        MatchEvent::MoveApplied {
            mover: Turn::Ai,
            index,
            board,
        } => Some(format!("AI plays {}.\n{}", index + 1, board)),
        MatchEvent::AiThinking => Some("AI is thinking...".to_string()),
        MatchEvent::Tick { .. } => None,
        MatchEvent::Finished {
            result,
            elapsed_seconds,
        } => Some(format!(
            "{}\nPress r to play again or q to quit.",
            result_message(*result, *elapsed_seconds)
        )),
        MatchEvent::Reset(state) => Some(format!("Board cleared.\n{}", state.board())),
    }
}

/// Renders the leaderboard with exactly `rows` lines, padding missing ranks.
pub fn render_leaderboard(entries: &[ScoreEntry], rows: usize) -> String {
    let mut out = String::from("Fastest wins\n");
    for rank in 0..rows {
        let line = match entries.get(rank) {
            Some(entry) => format!(
                "#{:<2} {:<16} {:>5}s  ({})",
                rank + 1,
                entry.name(),
                entry.time(),
                entry.difficulty()
            ),
            None => format!("#{:<2} {:<16} {:>6}", rank + 1, "-", "--"),
        };
        let _ = writeln!(out, "{}", line);
    }
    out
}

/// Plays one session in the terminal until the player quits or stdin closes.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or stdin fails.
#[instrument(skip_all, fields(name = %match_config.name(), difficulty = %match_config.difficulty()))]
pub async fn play(config: &AppConfig, match_config: MatchConfig) -> Result<()> {
    let scores: Arc<dyn ScoreStore> = Arc::new(ScoreRepository::open(config.db_path().clone())?);
    let controller = MatchController::new(match_config, scores);
    let (handle, mut events) = MatchRunner::spawn(controller, config.timing());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Stdin closed");
                    break;
                };
                match parse_input(&line) {
                    Input::Move(index) => handle.submit_move(index)?,
                    Input::Reset => handle.reset()?,
                    Input::Quit => break,
                    Input::Unknown => println!("{}", HELP),
                }
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                if let Some(text) = render_event(&event) {
                    println!("{}", text);
                }
            }
        }
    }

    handle.shutdown().await?;
    info!("Session ended");
    Ok(())
}

/// Prints the top `limit` scores.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or read.
#[instrument(skip(config))]
pub fn ranking(config: &AppConfig, limit: usize) -> Result<()> {
    let repository = ScoreRepository::open(config.db_path().clone())?;
    let entries = repository.top_scores(limit)?;
    print!("{}", render_leaderboard(&entries, limit));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xoox_engine::{Board, Difficulty, MatchState};

    #[test]
    fn test_parse_cells_are_one_based() {
        assert_eq!(parse_input("1"), Input::Move(0));
        assert_eq!(parse_input(" 9 \n"), Input::Move(8));
        assert_eq!(parse_input("0"), Input::Unknown);
        assert_eq!(parse_input("10"), Input::Unknown);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_input("r"), Input::Reset);
        assert_eq!(parse_input("q"), Input::Quit);
        assert_eq!(parse_input("hello"), Input::Unknown);
        assert_eq!(parse_input(""), Input::Unknown);
    }

    #[test]
    fn test_result_messages() {
        assert_eq!(result_message(MatchResult::Win(Player::X), 7), "You win in 7s!");
        assert_eq!(result_message(MatchResult::Win(Player::O), 3), "You lose after 3s.");
        assert_eq!(result_message(MatchResult::Draw, 12), "Draw after 12s.");
    }

    #[test]
    fn test_ticks_render_nothing() {
        assert_eq!(render_event(&MatchEvent::Tick { elapsed_seconds: 4 }), None);
    }

    #[test]
    fn test_started_shows_board_and_help() {
        let event = MatchEvent::Started(MatchState::new(Difficulty::Hard));
        let text = render_event(&event).unwrap();
        assert!(text.contains("hard"));
        assert!(text.contains(&Board::new().to_string()));
        assert!(text.contains(HELP));
    }

    #[test]
    fn test_leaderboard_pads_missing_rows() {
        let entries = vec![
            ScoreEntry::new("Ada".to_string(), Difficulty::Easy, 9),
            ScoreEntry::new("Lin".to_string(), Difficulty::Easy, 14),
        ];
        let text = render_leaderboard(&entries, 5);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("#1") && lines[1].contains("Ada") && lines[1].contains("9s"));
        assert!(lines[2].contains("Lin"));
        assert!(lines[5].starts_with("#5") && lines[5].ends_with("--"));
    }
}
