//! Tic-tac-toe session server library.
//!
//! Pairs two participants into a game, keeps both views consistent over
//! WebSocket, and enforces the rules through the `game-rules` crate.
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> lifecycle.rs -> store/ + registry/
//!                                        |
//!                                        +-> broadcast.rs -> connection outboxes
//! ```
//!
//! All game mutation goes through [`lifecycle::LifecycleCoordinator`], which
//! holds the game store and session registry behind a single lock.
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `models` - Identifiers and HTTP request/response bodies
//! - `protocol` - WebSocket message formats
//! - `store` - Game records
//! - `registry` - Live connections per game
//! - `broadcast` - Fan-out to connection outboxes
//! - `lifecycle` - State transitions for every game event
//! - `handlers` - HTTP and WebSocket handlers
//! - `middleware` - HTTP metrics middleware
//! - `routes` - Axum router setup
//! - `observability` - Prometheus metrics
//! - `tasks` - Background maintenance

pub mod broadcast;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod lifecycle;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod protocol;
pub mod registry;
pub mod routes;
pub mod store;
pub mod tasks;
