//! Connect four game server.
//!
//! Wraps the [`connect4`] rules engine in a service that persists games to
//! SQLite and pushes updates to WebSocket viewers.
//!
//! # Architecture
//!
//! - **Store**: [`GameStore`] seam, implemented by [`GameRepository`] (diesel/SQLite)
//! - **Rooms**: [`RoomRegistry`], a per-game broadcast [`Broadcaster`]
//! - **Service**: [`GameService`], per-game serialized load/apply/store/broadcast
//! - **HTTP**: [`router`], the REST API and the `/ws` upgrade behind a CORS layer
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use connect4_server::{GameRepository, GameService, RoomRegistry, ServerConfig, router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repo = GameRepository::new("connect4.db".to_string())?;
//! repo.migrate()?;
//! let service = GameService::new(Arc::new(repo), RoomRegistry::default());
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//! let cors = ServerConfig::default().cors_layer()?;
//! axum::serve(listener, router(service, cors)).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod db;
mod http;
mod protocol;
mod rooms;
mod service;
mod store;
mod ws;

pub use config::{ANY_ORIGIN, ConfigError, ServerConfig};
pub use db::{DbError, DbErrorKind, GameRecord, GameRepository, MIGRATIONS, NewGameRecord};
pub use http::{ApiError, router};
pub use protocol::{
    ClientEvent, ErrorBody, EventError, GameListing, GameView, MoveRequest, MoveResponse,
    RoomMembership, RoomRequest, ServerEvent,
};
pub use rooms::{Broadcaster, DEFAULT_ROOM_CAPACITY, RoomRegistry, room_key};
pub use service::{GameService, MoveReply, ServiceError};
pub use store::{GameId, GameStore, StoreError, StoredGame};
pub use ws::GREETING;
