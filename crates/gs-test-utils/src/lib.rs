//! # Game Server Test Utilities
//!
//! This crate provides:
//! - Server test harness (`TestGameServer` for E2E tests)
//! - WebSocket participant client (`TestPlayer`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gs_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestGameServer::spawn().await?;
//!     let game_id = server.create_game("Alice").await?;
//!
//!     let mut alice = TestPlayer::connect(&server, &game_id).await?;
//!     let state = alice.next_json().await?;
//!     assert_eq!(state["player1"], "X");
//!     Ok(())
//! }
//! ```

pub mod player;
pub mod server_harness;

// Re-export commonly used items
pub use player::*;
pub use server_harness::*;
