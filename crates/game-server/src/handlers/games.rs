//! Game creation and join handlers.
//!
//! These are the HTTP control endpoints. They only touch the game store;
//! participants are admitted later, when their WebSocket connects.

use crate::errors::GameServerError;
use crate::models::{CreateGameRequest, GameId, GameIdResponse, JoinGameRequest};
use crate::routes::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Handler for POST /create
///
/// # Request Body
///
/// ```json
/// { "name": "Alice" }
/// ```
///
/// # Response
///
/// - 200 OK: `{"gameId": "..."}`
/// - 400 Bad Request: Missing or empty name
#[instrument(skip_all, name = "gs.handlers.create_game")]
pub async fn create_game(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateGameRequest>,
) -> Result<Json<GameIdResponse>, GameServerError> {
    request
        .validate()
        .map_err(|e| GameServerError::BadRequest(e.to_string()))?;

    let game_id = state
        .coordinator
        .create_game(request.name.trim())
        .await?;

    info!(target: "gs.handlers.games", game_id = %game_id, "Game created");

    Ok(Json(GameIdResponse { game_id }))
}

/// Handler for POST /join
///
/// # Request Body
///
/// ```json
/// { "name": "Bob", "gameId": "9f86d081884c7d65" }
/// ```
///
/// # Response
///
/// - 200 OK: `{"gameId": "..."}`
/// - 400 Bad Request: Missing name or game ID
/// - 404 Not Found: No such game
/// - 409 Conflict: Game already has two participants
#[instrument(skip_all, name = "gs.handlers.join_game")]
pub async fn join_game(
    State(state): State<Arc<AppState>>,
    Json(request): Json<JoinGameRequest>,
) -> Result<Json<GameIdResponse>, GameServerError> {
    request
        .validate()
        .map_err(|e| GameServerError::BadRequest(e.to_string()))?;

    let game_id = GameId::from(request.game_id.trim());

    if let Err(e) = state
        .coordinator
        .join_game(&game_id, request.name.trim())
        .await
    {
        warn!(target: "gs.handlers.games", game_id = %game_id, error = %e, "Join refused");
        return Err(e.into());
    }

    info!(target: "gs.handlers.games", game_id = %game_id, "Game joined");

    Ok(Json(GameIdResponse { game_id }))
}
