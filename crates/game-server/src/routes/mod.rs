//! HTTP routes for the game server.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::lifecycle::LifecycleCoordinator;
use crate::middleware::http_metrics_middleware;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Owner of every game and connection.
    pub coordinator: Arc<LifecycleCoordinator>,

    /// Service configuration.
    pub config: Config,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `POST /create` - Create a game
/// - `POST /join` - Claim the second seat of a game
/// - `GET /ws/:game_id` - Participant WebSocket
/// - `/health` - Liveness probe with the active game count
/// - `/metrics` - Prometheus metrics endpoint
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - 30 second request timeout (applies to the upgrade, not the session)
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let game_routes = Router::new()
        .route("/create", post(handlers::create_game))
        .route("/join", post(handlers::join_game))
        .route("/ws/:game_id", get(handlers::game_socket))
        .route("/health", get(handlers::health_check))
        .with_state(state);

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. http_metrics_middleware - Record ALL responses (outermost)
    game_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}
