//! Errors raised by the games table.

use derive_more::{Display, Error};
use tracing::{instrument, warn};

/// What a games-table operation tripped over.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DbErrorKind {
    /// The repository was given a blank database path.
    #[display("database path is empty")]
    EmptyPath,
    /// The SQLite file could not be opened.
    #[display("cannot open '{}': {}", path, reason)]
    Connect {
        /// Database path that failed.
        path: String,
        /// Driver message.
        reason: String,
    },
    /// An embedded migration failed to apply.
    #[display("migrations failed: {}", _0)]
    Migration(String),
    /// A statement against `games` failed.
    #[display("query failed: {}", _0)]
    Query(String),
    /// An update targeted a row that does not exist.
    #[display("game {} not found", _0)]
    GameNotFound(i32),
    /// A game state could not be turned into its stored JSON.
    #[display("cannot encode game state: {}", _0)]
    StateEncoding(String),
}

/// Database error with the location that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Database error: {} at {}:{}", kind, file, line)]
pub struct DbError {
    /// What went wrong.
    pub kind: DbErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates an error of the given kind, recording the caller's location.
    #[track_caller]
    #[instrument]
    pub fn new(kind: DbErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        warn!(%kind, "Database operation failed");
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(DbErrorKind::Query(err.to_string()))
    }
}

impl From<serde_json::Error> for DbError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(DbErrorKind::StateEncoding(err.to_string()))
    }
}
