//! Game persistence seam between the service and the database.

use chrono::NaiveDateTime;
use connect4::{GameState, MalformedState};
use derive_getters::Getters;
use derive_more::{Display, Error, From};
use tracing::instrument;

use crate::db::{DbError, GameRecord, GameRepository};

/// Identifier of a stored game.
pub type GameId = i32;

/// Failure to load or save a game.
#[derive(Debug, Clone, Display, Error, From)]
pub enum StoreError {
    /// The database call failed.
    #[display("{}", _0)]
    Db(DbError),
    /// A stored row holds a state that cannot be a real game.
    #[display("Game {} is corrupted: {}", game_id, source)]
    #[from(ignore)]
    Malformed {
        /// The corrupted game.
        game_id: GameId,
        /// What decoding reported.
        source: MalformedState,
    },
}

/// An active game with its bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct StoredGame {
    id: GameId,
    state: GameState,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Key-value store of game states keyed by [`GameId`].
///
/// Implementations are synchronous; async callers run them on the
/// blocking pool.
pub trait GameStore: Send + Sync {
    /// Persists a new active game and returns its id.
    fn create(&self, state: &GameState) -> Result<GameId, StoreError>;

    /// Loads a game, or `None` if the id is unknown.
    fn load(&self, id: GameId) -> Result<Option<GameState>, StoreError>;

    /// Replaces the state of an existing game.
    fn save(&self, id: GameId, state: &GameState) -> Result<GameId, StoreError>;

    /// Removes a game from the active listing.
    fn mark_inactive(&self, id: GameId) -> Result<(), StoreError>;

    /// Lists active games, most recently updated first.
    fn list_active(&self) -> Result<Vec<StoredGame>, StoreError>;
}

/// Decodes the state column of a row.
#[instrument(skip(record), fields(game_id = record.id()))]
fn decode_record(record: GameRecord) -> Result<StoredGame, StoreError> {
    let state = connect4::from_json(record.game_state()).map_err(|source| StoreError::Malformed {
        game_id: *record.id(),
        source,
    })?;
    Ok(StoredGame {
        id: *record.id(),
        state,
        created_at: *record.created_at(),
        updated_at: *record.updated_at(),
    })
}

impl GameStore for GameRepository {
    fn create(&self, state: &GameState) -> Result<GameId, StoreError> {
        Ok(*self.create_game(state)?.id())
    }

    fn load(&self, id: GameId) -> Result<Option<GameState>, StoreError> {
        self.get_game(id)?
            .map(|record| decode_record(record).map(|game| game.state))
            .transpose()
    }

    fn save(&self, id: GameId, state: &GameState) -> Result<GameId, StoreError> {
        Ok(*self.update_game(id, state)?.id())
    }

    fn mark_inactive(&self, id: GameId) -> Result<(), StoreError> {
        Ok(self.complete_game(id)?)
    }

    fn list_active(&self) -> Result<Vec<StoredGame>, StoreError> {
        self.list_active_games()?
            .into_iter()
            .map(decode_record)
            .collect()
    }
}
