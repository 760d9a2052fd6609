//! WebSocket sessions for live game updates.
//!
//! Each frame is a JSON object `{"event": ..., "data": ...}`. A client sends
//! `join_game` / `leave_game` with a `game_id`; the server answers with
//! `joined_game` / `left_game` and pushes `game_updated` for every followed
//! game.

use std::collections::HashMap;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::protocol::{ClientEvent, RoomMembership, RoomRequest, ServerEvent};
use crate::rooms::room_key;
use crate::service::{GameService, ServiceError};
use crate::store::GameId;

/// Greeting sent when a socket opens.
pub const GREETING: &str = "Connected to server";

/// Upgrades `GET /ws` to a live-update session.
#[instrument(skip_all)]
pub async fn upgrade(State(service): State<GameService>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_session(socket, service))
}

/// One connected client and the games it follows.
struct Session {
    service: GameService,
    outbound: mpsc::UnboundedSender<ServerEvent>,
    follows: HashMap<GameId, JoinHandle<()>>,
}

#[instrument(skip_all)]
async fn run_session(socket: WebSocket, service: GameService) {
    info!("Client connected");
    let (mut sink, mut stream) = socket.split();
    let (outbound, mut queue) = mpsc::unbounded_channel::<ServerEvent>();

    let writer = tokio::spawn(async move {
        while let Some(event) = queue.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Failed to encode event");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let mut session = Session {
        service,
        outbound,
        follows: HashMap::new(),
    };
    session.send(ServerEvent::Connected(GREETING.to_string()));

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => session.handle_text(text.as_str()).await,
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "Socket error");
                break;
            }
        }
    }

    session.close();
    writer.abort();
    info!("Client disconnected");
}

impl Session {
    fn send(&self, event: ServerEvent) {
        // The writer only stops once the socket is gone.
        let _ = self.outbound.send(event);
    }

    async fn handle_text(&mut self, text: &str) {
        match serde_json::from_str::<ClientEvent>(text) {
            Ok(ClientEvent::JoinGame(req)) => self.join(req).await,
            Ok(ClientEvent::LeaveGame(req)) => self.leave(req),
            Err(e) => {
                debug!(error = %e, "Unreadable frame");
                self.send(ServerEvent::error(format!("Invalid message: {}", e)));
            }
        }
    }

    #[instrument(skip(self))]
    async fn join(&mut self, req: RoomRequest) {
        let Some(game_id) = req.game_id else {
            self.send(ServerEvent::error("Game ID not provided"));
            return;
        };

        match self.service.subscribe(game_id).await {
            Ok((view, receiver)) => {
                if let Some(previous) = self.follows.remove(&game_id) {
                    previous.abort();
                }
                self.send(ServerEvent::JoinedGame(RoomMembership {
                    game_id,
                    room: room_key(game_id),
                }));
                self.send(ServerEvent::GameUpdated(view));
                let forwarder = forward(game_id, receiver, self.outbound.clone());
                self.follows.insert(game_id, forwarder);
                info!(room = %room_key(game_id), "Client joined game room");
            }
            Err(ServiceError::NotFound(_)) => {
                warn!(game_id, "Game room not found");
                self.send(ServerEvent::error("Game not found"));
            }
            Err(e) => {
                warn!(game_id, error = %e, "Join failed");
                self.send(ServerEvent::error(e.to_string()));
            }
        }
    }

    #[instrument(skip(self))]
    fn leave(&mut self, req: RoomRequest) {
        let Some(game_id) = req.game_id else {
            self.send(ServerEvent::error("Game ID not provided"));
            return;
        };
        if let Some(forwarder) = self.follows.remove(&game_id) {
            forwarder.abort();
        }
        self.send(ServerEvent::LeftGame(RoomMembership {
            game_id,
            room: room_key(game_id),
        }));
        info!(room = %room_key(game_id), "Client left game room");
    }

    fn close(&mut self) {
        for (_, forwarder) in self.follows.drain() {
            forwarder.abort();
        }
    }
}

/// Copies a room's events into a client's outbound queue.
fn forward(
    game_id: GameId,
    mut receiver: broadcast::Receiver<ServerEvent>,
    outbound: mpsc::UnboundedSender<ServerEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if outbound.send(event).is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(game_id, skipped, "Client fell behind, updates dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
