//! Metrics definitions for the game server.
//!
//! All metrics follow Prometheus naming conventions:
//! - `gs_` prefix for the game server
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded by code, never by game or connection identifiers:
//! - `reason`: deletion reasons, move rejection reasons, delivery failures
//! - `outcome`: connection admission outcomes
//! - `event`: coordinator event kinds (~6 values)

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus recorder and return the handle used by the
/// `/metrics` endpoint.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        // Transitions run under one lock; anything past a few ms is contention
        .set_buckets_for_metric(
            Matcher::Prefix("gs_transition".to_string()),
            &[
                0.0001, 0.0005, 0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250,
            ],
        )
        .map_err(|e| format!("Failed to set transition buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("gs_http".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus metrics recorder: {e}"))
}

// ============================================================================
// HTTP Requests
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `gs_http_requests_total`, `gs_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status_code` / `status`
pub fn record_http_request(method: &str, path: &str, status_code: u16, duration: Duration) {
    let endpoint = normalize_endpoint(path);
    let status = categorize_status_code(status_code);

    histogram!("gs_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("gs_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        101 | 200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Collapse paths to a fixed set so game IDs never become label values.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/create" => "/create",
        "/join" => "/join",
        "/health" => "/health",
        "/metrics" => "/metrics",
        p if p.starts_with("/ws/") => "/ws/{game_id}",
        _ => "/other",
    }
}

// ============================================================================
// Game Lifecycle
// ============================================================================

/// Metric: `gs_games_created_total`
pub fn record_game_created() {
    counter!("gs_games_created_total").increment(1);
}

/// Metric: `gs_games_deleted_total`
/// Labels: `reason` (empty, creator_left, idle)
pub fn record_game_deleted(reason: &'static str) {
    counter!("gs_games_deleted_total", "reason" => reason).increment(1);
}

/// Metric: `gs_active_games`
pub fn set_active_games(count: usize) {
    #[allow(clippy::cast_precision_loss)]
    gauge!("gs_active_games").set(count as f64);
}

/// Metric: `gs_transition_duration_seconds`
/// Labels: `event`
///
/// Time spent inside the coordinator's critical section.
pub fn record_transition(event: &'static str, duration: Duration) {
    histogram!("gs_transition_duration_seconds", "event" => event)
        .record(duration.as_secs_f64());
}

// ============================================================================
// Connections
// ============================================================================

/// Metric: `gs_connections_total`
/// Labels: `outcome` (admitted, not_found, full)
pub fn record_connection(outcome: &'static str) {
    counter!("gs_connections_total", "outcome" => outcome).increment(1);
}

/// Metric: `gs_active_connections`
pub fn set_active_connections(count: usize) {
    #[allow(clippy::cast_precision_loss)]
    gauge!("gs_active_connections").set(count as f64);
}

// ============================================================================
// Messages
// ============================================================================

/// Metric: `gs_moves_total`
/// Labels: `outcome` (accepted, or a rejection reason)
pub fn record_move(outcome: &'static str) {
    counter!("gs_moves_total", "outcome" => outcome).increment(1);
}

/// Metric: `gs_malformed_messages_total`
pub fn record_malformed_message() {
    counter!("gs_malformed_messages_total").increment(1);
}

/// Metric: `gs_broadcast_failures_total`
/// Labels: `reason` (full, closed, serialize)
pub fn record_broadcast_failure(reason: &'static str) {
    counter!("gs_broadcast_failures_total", "reason" => reason).increment(1);
}
