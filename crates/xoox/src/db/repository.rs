//! Database repository for the leaderboard.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};
use xoox_engine::{Difficulty, ScoreEntry, ScoreError, ScoreStore};

use crate::db::{DbError, NewScore, Score, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// SQLite-backed score repository.
#[derive(Debug, Clone)]
pub struct ScoreRepository {
    db_path: String,
}

impl ScoreRepository {
    /// Opens the database at `db_path`, creating the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Opening ScoreRepository");
        let repo = Self { db_path };
        repo.migrate()?;
        Ok(repo)
    }

    /// Path of the underlying database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    #[instrument(skip(self))]
    fn migrate(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?
            .len();
        info!(applied, "Schema up to date");
        Ok(())
    }

    /// Records a winning time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, score), fields(name = %score.name(), difficulty = %score.difficulty(), time = score.time()))]
    pub fn record_score(&self, score: NewScore) -> Result<Score, DbError> {
        debug!("Recording score");
        let mut conn = self.connection()?;

        let stored = diesel::insert_into(schema::scores::table)
            .values(&score)
            .returning(Score::as_returning())
            .get_result(&mut conn)?;

        info!(score_id = stored.id(), time = stored.time(), "Score recorded");
        Ok(stored)
    }

    /// Loads at most `limit` scores, fastest first; equal times keep insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn load_top_scores(&self, limit: i64) -> Result<Vec<Score>, DbError> {
        debug!(limit, "Loading top scores");
        let mut conn = self.connection()?;

        let scores = schema::scores::table
            .order((schema::scores::time.asc(), schema::scores::id.asc()))
            .limit(limit)
            .select(Score::as_select())
            .load(&mut conn)?;

        info!(count = scores.len(), "Top scores loaded");
        Ok(scores)
    }
}

impl ScoreStore for ScoreRepository {
    fn insert_score(&self, name: &str, difficulty: Difficulty, time: u32) -> Result<(), ScoreError> {
        let score = NewScore::from_result(name, difficulty, time)?;
        self.record_score(score)?;
        Ok(())
    }

    fn top_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>, ScoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let entries = self
            .load_top_scores(limit)?
            .iter()
            .map(Score::to_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
