//! REST API.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use derive_more::{Display, Error};
use tower_http::cors::CorsLayer;
use tracing::{error, instrument, warn};

use crate::protocol::{ErrorBody, GameListing, GameView, MoveRequest, MoveResponse};
use crate::service::{GameService, MoveReply, ServiceError};
use crate::store::GameId;

/// Builds the application router: REST routes plus the `/ws` upgrade,
/// wrapped in the given cross-origin policy.
pub fn router(service: GameService, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/games", post(create_game).get(list_games))
        .route("/api/games/{id}", get(get_game))
        .route("/api/games/{id}/move", post(make_move))
        .route("/ws", get(crate::ws::upgrade))
        .layer(cors)
        .with_state(service)
}

/// Error response of the REST API.
#[derive(Debug, Display, Error)]
pub enum ApiError {
    /// Unknown game id (404).
    #[display("Game not found")]
    NotFound,
    /// Move body without a usable column (400).
    #[display("Column not specified")]
    MissingColumn,
    /// Anything else, including corrupted stored state (500).
    #[display("{}", _0)]
    Internal(ServiceError),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(_) => Self::NotFound,
            other => Self::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MissingColumn => StatusCode::BAD_REQUEST,
            Self::Internal(err) => {
                error!(error = %err, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[instrument(skip(service))]
async fn create_game(State(service): State<GameService>) -> Result<Json<GameView>, ApiError> {
    Ok(Json(service.create_game().await?))
}

#[instrument(skip(service))]
async fn get_game(
    State(service): State<GameService>,
    Path(id): Path<GameId>,
) -> Result<Json<GameView>, ApiError> {
    Ok(Json(service.get_game(id).await?))
}

/// Rejected moves answer 200 with `error` set, so clients can always
/// render the returned state.
#[instrument(skip(service, body))]
async fn make_move(
    State(service): State<GameService>,
    Path(id): Path<GameId>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<MoveResponse>, ApiError> {
    let column = match body {
        Ok(Json(MoveRequest { column: Some(column) })) => column,
        other => {
            if let Err(rejection) = &other {
                warn!(game_id = id, error = %rejection, "Unreadable move body");
            }
            // An unknown game wins over a bad body.
            service.get_game(id).await?;
            return Err(ApiError::MissingColumn);
        }
    };

    let response = match service.make_move(id, column).await? {
        MoveReply::Accepted { state, message } => MoveResponse {
            id,
            state,
            message: Some(message),
            error: None,
        },
        MoveReply::Rejected { state, rejection } => MoveResponse {
            id,
            state,
            message: None,
            error: Some(rejection.to_string()),
        },
    };
    Ok(Json(response))
}

#[instrument(skip(service))]
async fn list_games(State(service): State<GameService>) -> Result<Json<Vec<GameListing>>, ApiError> {
    Ok(Json(service.list_games().await?))
}
