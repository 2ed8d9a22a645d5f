//! Tic-tac-toe rules engine.
//!
//! This crate holds the pure game logic shared by the session server:
//! the board, the two roles, the game record, and the functions that
//! validate and apply moves. Nothing here performs I/O or holds shared
//! state, so every function is safe to call from any task without
//! synchronization.
//!
//! # Modules
//!
//! - [`role`] - The two sides of a game (`X` moves first)
//! - [`board`] - Fixed nine-cell board
//! - [`game`] - Game record as broadcast to participants
//! - [`engine`] - Move application, win and draw detection

#![warn(clippy::pedantic)]

pub mod board;
pub mod engine;
pub mod game;
pub mod role;

pub use board::{Board, CELL_COUNT};
pub use engine::{apply_move, check_draw, check_win, MoveOutcome, RuleViolation, WINNING_LINES};
pub use game::Game;
pub use role::Role;
