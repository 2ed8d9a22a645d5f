//! HTTP middleware for the game server.

pub mod http_metrics;

pub use http_metrics::http_metrics_middleware;
