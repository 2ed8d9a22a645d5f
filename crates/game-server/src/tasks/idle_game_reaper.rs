//! Idle game reaper background task.
//!
//! A game is only deleted by a departure once someone has connected to it.
//! Games created over HTTP and never connected to, or left with no
//! connections, would otherwise stay in memory forever. This task removes
//! games that have had no connections and no activity for the configured
//! TTL.
//!
//! # Graceful Shutdown
//!
//! The task exits when its cancellation token is cancelled.

use crate::lifecycle::LifecycleCoordinator;
use crate::observability::metrics;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Start the idle game reaper.
///
/// Runs one pass every `interval`, deleting games idle for at least `ttl`.
/// Returns when the cancellation token is triggered.
#[instrument(skip_all, name = "gs.task.reaper")]
pub async fn start_idle_game_reaper(
    coordinator: Arc<LifecycleCoordinator>,
    interval: Duration,
    ttl: Duration,
    cancel_token: CancellationToken,
) {
    info!(
        target: "gs.task.reaper",
        interval_seconds = interval.as_secs(),
        ttl_seconds = ttl.as_secs(),
        "Starting idle game reaper"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run_pass(&coordinator, ttl).await;
            }
            _ = cancel_token.cancelled() => {
                info!(
                    target: "gs.task.reaper",
                    "Idle game reaper received shutdown signal, exiting"
                );
                break;
            }
        }
    }

    info!(target: "gs.task.reaper", "Idle game reaper stopped");
}

async fn run_pass(coordinator: &LifecycleCoordinator, ttl: Duration) {
    let removed = coordinator.reap_idle(ttl).await;
    let remaining = coordinator.active_games().await;
    metrics::set_active_games(remaining);

    if removed > 0 {
        info!(target: "gs.task.reaper", removed, remaining, "Removed idle games");
    } else {
        debug!(target: "gs.task.reaper", remaining, "No idle games");
    }
}
