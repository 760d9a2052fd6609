//! Database repository for stored games.

use connect4::GameState;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, DbErrorKind, GameRecord, NewGameRecord, schema};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Database repository for game rows.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// The file is created on first connection if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new(DbErrorKind::EmptyPath));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Returns the database path.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(DbErrorKind::Connect {
                path: self.db_path.clone(),
                reason: e.to_string(),
            })
        })?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))?;
        Ok(conn)
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn migrate(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(DbErrorKind::Migration(e.to_string())))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Inserts a new active game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, state))]
    pub fn create_game(&self, state: &GameState) -> Result<GameRecord, DbError> {
        debug!("Creating game");
        let mut conn = self.connection()?;

        let new_game = NewGameRecord::new(connect4::to_json(state)?);

        let record = diesel::insert_into(schema::games::table)
            .values(&new_game)
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)?;

        info!(game_id = record.id(), "Game created");
        Ok(record)
    }

    /// Gets a game by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_game(&self, game_id: i32) -> Result<Option<GameRecord>, DbError> {
        debug!(game_id, "Looking up game");
        let mut conn = self.connection()?;

        let record = schema::games::table
            .find(game_id)
            .select(GameRecord::as_select())
            .first(&mut conn)
            .optional()?;

        if record.is_none() {
            debug!(game_id, "Game not found");
        }

        Ok(record)
    }

    /// Replaces a game's state and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the game does not exist or a database error occurs.
    #[instrument(skip(self, state))]
    pub fn update_game(&self, game_id: i32, state: &GameState) -> Result<GameRecord, DbError> {
        debug!(game_id, moves = state.history().len(), "Updating game");
        let mut conn = self.connection()?;

        let record = diesel::update(schema::games::table.find(game_id))
            .set((
                schema::games::game_state.eq(connect4::to_json(state)?),
                schema::games::updated_at.eq(diesel::dsl::now),
            ))
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)
            .optional()?
            .ok_or_else(|| DbError::new(DbErrorKind::GameNotFound(game_id)))?;

        info!(game_id, "Game updated");
        Ok(record)
    }

    /// Marks a game as no longer active.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn complete_game(&self, game_id: i32) -> Result<(), DbError> {
        let mut conn = self.connection()?;

        let rows = diesel::update(schema::games::table.find(game_id))
            .set(schema::games::is_active.eq(false))
            .execute(&mut conn)?;

        info!(game_id, rows, "Game marked inactive");
        Ok(())
    }

    /// Lists active games, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_active_games(&self) -> Result<Vec<GameRecord>, DbError> {
        debug!("Listing active games");
        let mut conn = self.connection()?;

        let records = schema::games::table
            .filter(schema::games::is_active.eq(true))
            .order((schema::games::updated_at.desc(), schema::games::id.desc()))
            .select(GameRecord::as_select())
            .load(&mut conn)?;

        info!(count = records.len(), "Active games loaded");
        Ok(records)
    }
}
