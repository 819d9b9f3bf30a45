//! Match configuration and timing.

use crate::types::Difficulty;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

/// Default delay before the AI plays its move.
pub const DEFAULT_AI_DELAY: Duration = Duration::from_millis(500);

/// Default period of the match clock.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Who is playing and at which difficulty.
///
/// Deserializing goes through [`MatchConfig::new`], so the same name rules apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(try_from = "RawMatchConfig")]
pub struct MatchConfig {
    /// Player name, never blank.
    name: String,
    /// AI difficulty.
    difficulty: Difficulty,
}

impl MatchConfig {
    /// Creates a match configuration. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`MatchConfigError`] if the name is empty or blank.
    #[instrument(skip_all, fields(difficulty = %difficulty))]
    pub fn new(name: impl AsRef<str>, difficulty: Difficulty) -> Result<Self, MatchConfigError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(MatchConfigError::new("Player name must not be empty"));
        }
        Ok(Self {
            name: name.to_string(),
            difficulty,
        })
    }
}

#[derive(Deserialize)]
struct RawMatchConfig {
    name: String,
    difficulty: Difficulty,
}

impl TryFrom<RawMatchConfig> for MatchConfig {
    type Error = MatchConfigError;

    fn try_from(raw: RawMatchConfig) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.difficulty)
    }
}

/// Scheduling delays used by the match runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, derive_new::new)]
pub struct MatchTiming {
    /// Pause between the human's move and the AI's reply.
    ai_delay: Duration,
    /// Clock period; each period adds one elapsed second.
    tick: Duration,
}

impl Default for MatchTiming {
    fn default() -> Self {
        Self::new(DEFAULT_AI_DELAY, DEFAULT_TICK)
    }
}

/// Match configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Match config error: {} at {}:{}", message, file, line)]
pub struct MatchConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl MatchConfigError {
    /// Creates a new configuration error.
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
