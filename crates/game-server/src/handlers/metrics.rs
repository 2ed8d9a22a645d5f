//! Prometheus metrics endpoint handler.
//!
//! Labels are bounded by code; no game or connection identifiers are
//! exported.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
///
/// Returns Prometheus-formatted metrics for scraping:
/// ```text
/// # TYPE gs_games_created_total counter
/// gs_games_created_total 42
/// ```
#[tracing::instrument(skip_all, name = "gs.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
