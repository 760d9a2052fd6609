//! SQLite persistence for games.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::{DbError, DbErrorKind};
pub use models::{GameRecord, NewGameRecord};
pub use repository::{GameRepository, MIGRATIONS};
