//! Score reporting port.
//!
//! The controller reports best times through [`ScoreStore`] and knows nothing
//! else about storage. Hosts plug in a database; tests and embedders can use
//! [`InMemoryScoreStore`].

use crate::types::Difficulty;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, new)]
pub struct ScoreEntry {
    /// Player name.
    name: String,
    /// Difficulty the match was played at.
    difficulty: Difficulty,
    /// Elapsed seconds; lower ranks higher.
    time: u32,
}

/// Score storage error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Score store error: {} at {}:{}", message, file, line)]
pub struct ScoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ScoreError {
    /// Creates a new score error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Persistence for best times.
pub trait ScoreStore: std::fmt::Debug + Send + Sync {
    /// Records a finished match time.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError`] if the score could not be stored.
    fn insert_score(&self, name: &str, difficulty: Difficulty, time: u32) -> Result<(), ScoreError>;

    /// Returns at most `limit` scores, fastest first.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError`] if the scores could not be read.
    fn top_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>, ScoreError>;
}

/// Thread-safe in-memory score store.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScoreStore {
    entries: Arc<Mutex<Vec<ScoreEntry>>>,
}

impl InMemoryScoreStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every stored entry in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError`] if the storage lock is poisoned.
    pub fn entries(&self) -> Result<Vec<ScoreEntry>, ScoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| ScoreError::new(format!("Score storage lock poisoned: {}", e)))?;
        Ok(entries.clone())
    }
}

impl ScoreStore for InMemoryScoreStore {
    #[instrument(skip(self))]
    fn insert_score(&self, name: &str, difficulty: Difficulty, time: u32) -> Result<(), ScoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| ScoreError::new(format!("Score storage lock poisoned: {}", e)))?;
        entries.push(ScoreEntry::new(name.to_string(), difficulty, time));
        debug!(count = entries.len(), "Score stored in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    fn top_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>, ScoreError> {
        let mut entries = self.entries()?;
        // Stable sort keeps insertion order between equal times.
        entries.sort_by_key(|entry| entry.time);
        entries.truncate(limit);
        Ok(entries)
    }
}
