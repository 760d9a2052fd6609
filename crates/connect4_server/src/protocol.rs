//! JSON bodies of the REST API and the live-update channel.

use chrono::NaiveDateTime;
use connect4::GameState;
use serde::{Deserialize, Serialize};

use crate::store::{GameId, StoredGame};

/// A game and its id, as returned by create and fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    /// Game id.
    pub id: GameId,
    /// Current state.
    pub state: GameState,
}

/// An entry of the active-games listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameListing {
    /// Game id.
    pub id: GameId,
    /// Current state.
    pub state: GameState,
    /// When the game was created.
    pub created_at: NaiveDateTime,
    /// When the game last changed.
    pub updated_at: NaiveDateTime,
}

impl From<StoredGame> for GameListing {
    fn from(game: StoredGame) -> Self {
        Self {
            id: *game.id(),
            created_at: *game.created_at(),
            updated_at: *game.updated_at(),
            state: game.state().clone(),
        }
    }
}

/// Body of `POST /api/games/{id}/move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Column to drop into. Range checking is the engine's job.
    pub column: Option<i64>,
}

/// Reply to a move attempt: exactly one of `message` or `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Game id.
    pub id: GameId,
    /// State after the attempt (unchanged when rejected).
    pub state: GameState,
    /// Outcome summary of an accepted move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Reason a move was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of an HTTP error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub error: String,
}

/// Names a game for join and leave requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRequest {
    /// The game to follow.
    pub game_id: Option<GameId>,
}

/// Confirms a join or leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMembership {
    /// The game.
    pub game_id: GameId,
    /// Room name of the game.
    pub room: String,
}

/// Error pushed over the live channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventError {
    /// Human-readable reason.
    pub message: String,
}

/// Frame sent by a WebSocket client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Start receiving updates for a game.
    JoinGame(RoomRequest),
    /// Stop receiving updates for a game.
    LeaveGame(RoomRequest),
}

/// Frame sent to a WebSocket client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Greeting sent when the socket opens.
    Connected(String),
    /// A join succeeded.
    JoinedGame(RoomMembership),
    /// A leave succeeded.
    LeftGame(RoomMembership),
    /// A game changed, or the current state on join.
    GameUpdated(GameView),
    /// A request failed.
    Error(EventError),
}

impl ServerEvent {
    /// Builds an error event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(EventError {
            message: message.into(),
        })
    }
}
