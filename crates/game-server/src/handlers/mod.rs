//! HTTP and WebSocket request handlers.

pub mod games;
pub mod health;
pub mod metrics;
pub mod ws;

pub use games::{create_game, join_game};
pub use health::health_check;
pub use metrics::metrics_handler;
pub use ws::game_socket;
