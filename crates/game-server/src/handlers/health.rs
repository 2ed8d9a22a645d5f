//! Health check handler.

use crate::models::HealthResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /health
///
/// Games live in process memory, so the server is healthy whenever it can
/// answer. The response also reports how many games are currently held.
///
/// ## Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "active_games": 3
/// }
/// ```
#[instrument(skip_all, name = "gs.health.check")]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        active_games: state.coordinator.active_games().await,
    })
}
