//! Game orchestration: load, apply, store, broadcast.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use connect4::{GameState, Rejection};
use derive_more::{Display, Error, From};
use tokio::sync::{Mutex, OwnedMutexGuard, broadcast};
use tracing::{debug, info, instrument, warn};

use crate::protocol::{GameListing, GameView, ServerEvent};
use crate::rooms::{Broadcaster, RoomRegistry};
use crate::store::{GameId, GameStore, StoreError};

/// Failure of a service operation.
#[derive(Debug, Display, Error, From)]
pub enum ServiceError {
    /// No game with this id.
    #[display("Game {} not found", _0)]
    #[from(ignore)]
    NotFound(#[error(not(source))] GameId),
    /// Persistence failed or returned a corrupted game.
    #[display("{}", _0)]
    Store(StoreError),
    /// A storage task panicked or was cancelled.
    #[display("Storage task failed: {}", _0)]
    Task(tokio::task::JoinError),
}

/// What happened to a move attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveReply {
    /// The move was applied, stored and broadcast.
    Accepted {
        /// State after the move.
        state: GameState,
        /// Outcome summary.
        message: String,
    },
    /// The engine refused the move; nothing was stored.
    Rejected {
        /// The unchanged state.
        state: GameState,
        /// Why.
        rejection: Rejection,
    },
}

impl MoveReply {
    /// The state to show after the attempt.
    pub fn state(&self) -> &GameState {
        match self {
            Self::Accepted { state, .. } | Self::Rejected { state, .. } => state,
        }
    }
}

/// Per-game locks so load-apply-store never interleaves for one id.
///
/// An entry lives only while some caller holds or awaits it, so ids that
/// were never real games leave nothing behind.
#[derive(Debug, Clone, Default)]
struct GameLocks {
    locks: Arc<StdMutex<HashMap<GameId, Arc<Mutex<()>>>>>,
}

/// Exclusive access to one game; releases and prunes on drop.
struct GameGuard {
    guard: Option<OwnedMutexGuard<()>>,
    locks: GameLocks,
}

impl GameLocks {
    fn entries(&self) -> MutexGuard<'_, HashMap<GameId, Arc<Mutex<()>>>> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn lock(&self, id: GameId) -> GameGuard {
        let lock = Arc::clone(self.entries().entry(id).or_default());
        GameGuard {
            guard: Some(lock.lock_owned().await),
            locks: self.clone(),
        }
    }

    /// Drops entries nobody holds or awaits.
    fn prune(&self) {
        self.entries().retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries().len()
    }
}

impl Drop for GameGuard {
    fn drop(&mut self) {
        self.guard.take();
        self.locks.prune();
    }
}

/// Game service shared by the HTTP and WebSocket handlers.
#[derive(Clone)]
pub struct GameService {
    store: Arc<dyn GameStore>,
    rooms: RoomRegistry,
    locks: GameLocks,
}

impl std::fmt::Debug for GameService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameService")
            .field("rooms", &self.rooms)
            .finish_non_exhaustive()
    }
}

impl GameService {
    /// Creates a service over a store and a room registry.
    pub fn new(store: Arc<dyn GameStore>, rooms: RoomRegistry) -> Self {
        info!("Creating game service");
        Self {
            store,
            rooms,
            locks: GameLocks::default(),
        }
    }

    /// Returns the room registry.
    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Runs a store call on the blocking pool.
    async fn with_store<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn GameStore) -> Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        Ok(tokio::task::spawn_blocking(move || f(store.as_ref())).await??)
    }

    /// Starts a new game and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails.
    #[instrument(skip(self))]
    pub async fn create_game(&self) -> Result<GameView, ServiceError> {
        let state = GameState::new();
        let stored = state.clone();
        let id = self.with_store(move |store| store.create(&stored)).await?;
        info!(game_id = id, "Game created");
        Ok(GameView { id, state })
    }

    /// Fetches a game.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub async fn get_game(&self, id: GameId) -> Result<GameView, ServiceError> {
        let state = self
            .with_store(move |store| store.load(id))
            .await?
            .ok_or(ServiceError::NotFound(id))?;
        Ok(GameView { id, state })
    }

    /// Applies a move to a stored game.
    ///
    /// Holds the game's lock from load to broadcast. An accepted move is
    /// saved, the game is marked inactive if it just ended, and
    /// `game_updated` goes to the game's room. A rejected move changes
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown id, or the store's
    /// failure. Engine rejections are not errors; see [`MoveReply`].
    #[instrument(skip(self))]
    pub async fn make_move(&self, id: GameId, column: i64) -> Result<MoveReply, ServiceError> {
        let _guard = self.locks.lock(id).await;

        let state = self
            .with_store(move |store| store.load(id))
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        let outcome = match connect4::apply_move(&state, column) {
            Ok(outcome) => outcome,
            Err(rejection) => {
                warn!(game_id = id, column, reason = rejection.as_ref(), "Move rejected");
                return Ok(MoveReply::Rejected { state, rejection });
            }
        };

        let message = outcome.message();
        let state = outcome.into_state();
        let game_over = state.is_over();

        let stored = state.clone();
        self.with_store(move |store| {
            store.save(id, &stored)?;
            if game_over {
                store.mark_inactive(id)?;
            }
            Ok(())
        })
        .await?;

        if game_over {
            info!(game_id = id, status = ?state.status(), "Game over");
        }

        self.rooms.publish(
            id,
            ServerEvent::GameUpdated(GameView {
                id,
                state: state.clone(),
            }),
        );

        info!(game_id = id, column, %message, "Move applied");
        Ok(MoveReply::Accepted { state, message })
    }

    /// Lists active games, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] if the store fails.
    #[instrument(skip(self))]
    pub async fn list_games(&self) -> Result<Vec<GameListing>, ServiceError> {
        let games = self.with_store(|store| store.list_active()).await?;
        debug!(count = games.len(), "Listed games");
        Ok(games.into_iter().map(GameListing::from).collect())
    }

    /// Follows a game: returns its current state and a receiver for every
    /// later update.
    ///
    /// No update can fall between the returned state and the first event.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub async fn subscribe(
        &self,
        id: GameId,
    ) -> Result<(GameView, broadcast::Receiver<ServerEvent>), ServiceError> {
        let _guard = self.locks.lock(id).await;
        let view = self.get_game(id).await?;
        let receiver = self.rooms.subscribe(id);
        debug!(game_id = id, subscribers = self.rooms.subscriber_count(id), "Subscribed");
        Ok((view, receiver))
    }
}
