//! Database models.

use std::str::FromStr;

use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;
use xoox_engine::{Difficulty, ScoreEntry};

use crate::db::{DbError, schema};

/// Stored score row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::scores)]
pub struct Score {
    id: i32,
    name: String,
    difficulty: String,
    time: i32,
}

impl Score {
    /// Parses the stored difficulty string.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the column holds an unknown value.
    #[instrument(skip(self), fields(difficulty = %self.difficulty))]
    pub fn parse_difficulty(&self) -> Result<Difficulty, DbError> {
        Difficulty::from_str(&self.difficulty)
            .map_err(|_| DbError::new(format!("Invalid difficulty: '{}'", self.difficulty)))
    }

    /// Converts the row into a leaderboard entry.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the difficulty or time column is invalid.
    #[instrument(skip(self), fields(id = self.id))]
    pub fn to_entry(&self) -> Result<ScoreEntry, DbError> {
        let time = u32::try_from(self.time)
            .map_err(|_| DbError::new(format!("Invalid time: {}", self.time)))?;
        Ok(ScoreEntry::new(self.name.clone(), self.parse_difficulty()?, time))
    }
}

/// Insertable score row.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::scores)]
pub struct NewScore {
    name: String,
    difficulty: String,
    time: i32,
}

impl NewScore {
    /// Builds a row from a match result.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if `time` does not fit the column.
    #[instrument(skip(name))]
    pub fn from_result(name: &str, difficulty: Difficulty, time: u32) -> Result<Self, DbError> {
        let time = i32::try_from(time)
            .map_err(|_| DbError::new(format!("Time out of range: {}", time)))?;
        Ok(Self::new(name.to_string(), difficulty.to_string(), time))
    }
}
