//! Live-update rooms, one per game.
//!
//! Rooms are ephemeral and created on first subscribe, so a restart only
//! drops the sockets that were listening, never the ability to join.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use tracing::{debug, instrument};

use crate::protocol::ServerEvent;
use crate::store::GameId;

/// Events buffered per room before slow subscribers start missing some.
pub const DEFAULT_ROOM_CAPACITY: usize = 64;

/// Fire-and-forget notification of game changes.
pub trait Broadcaster: Send + Sync {
    /// Delivers `event` to whoever follows `game_id`. Never fails.
    fn publish(&self, game_id: GameId, event: ServerEvent);
}

/// Room name of a game.
pub fn room_key(game_id: GameId) -> String {
    format!("game_{}", game_id)
}

/// Registry of broadcast rooms keyed by game id.
#[derive(Debug, Clone)]
pub struct RoomRegistry {
    rooms: Arc<Mutex<HashMap<GameId, broadcast::Sender<ServerEvent>>>>,
    capacity: usize,
}

impl RoomRegistry {
    /// Creates an empty registry whose rooms buffer `capacity` events.
    #[instrument]
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    fn rooms(&self) -> MutexGuard<'_, HashMap<GameId, broadcast::Sender<ServerEvent>>> {
        self.rooms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribes to a game's room, creating the room if needed.
    #[instrument(skip(self))]
    pub fn subscribe(&self, game_id: GameId) -> broadcast::Receiver<ServerEvent> {
        let mut rooms = self.rooms();
        let sender = rooms.entry(game_id).or_insert_with(|| {
            debug!(room = %room_key(game_id), "Creating room");
            broadcast::channel(self.capacity).0
        });
        sender.subscribe()
    }

    /// Number of live subscribers of a game's room.
    pub fn subscriber_count(&self, game_id: GameId) -> usize {
        self.rooms()
            .get(&game_id)
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Number of rooms currently held.
    pub fn room_count(&self) -> usize {
        self.rooms().len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_CAPACITY)
    }
}

impl Broadcaster for RoomRegistry {
    #[instrument(skip(self, event))]
    fn publish(&self, game_id: GameId, event: ServerEvent) {
        let mut rooms = self.rooms();
        let Some(sender) = rooms.get(&game_id) else {
            debug!("No room, dropping event");
            return;
        };
        match sender.send(event) {
            Ok(receivers) => debug!(receivers, "Event published"),
            Err(_) => {
                debug!(room = %room_key(game_id), "Room empty, removing");
                rooms.remove(&game_id);
            }
        }
    }
}
