//! Database persistence for the best-times leaderboard.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{NewScore, Score};
pub use repository::ScoreRepository;
