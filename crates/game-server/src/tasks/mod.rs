//! Background tasks for the game server.
//!
//! # Tasks
//!
//! - `idle_game_reaper` - Removes games nobody is connected to

pub mod idle_game_reaper;

pub use idle_game_reaper::start_idle_game_reaper;
