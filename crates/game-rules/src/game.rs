//! Game record.
//!
//! A [`Game`] is the full state both participants see. It is serialized as
//! is and sent to every connection after each accepted transition.

use crate::board::Board;
use crate::role::Role;
use serde::{Deserialize, Serialize};

/// State of one tic-tac-toe session.
///
/// Invariants upheld by [`crate::engine::apply_move`]:
/// - `turn` is `None` exactly when the game is finished
/// - `winner` and `is_draw` are never both set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub(crate) board: Board,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) turn: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) winner: Option<Role>,

    #[serde(default)]
    pub(crate) is_draw: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    player1: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    player2: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    player1_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    player2_name: Option<String>,
}

impl Game {
    /// New game waiting for its participants. `X` moves first.
    #[must_use]
    pub fn new(creator_name: impl Into<String>) -> Self {
        Self {
            board: Board::new(),
            turn: Some(Role::First),
            winner: None,
            is_draw: false,
            player1: None,
            player2: None,
            player1_name: Some(creator_name.into()),
            player2_name: None,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Role to move next, `None` once the game is finished.
    #[must_use]
    pub fn turn(&self) -> Option<Role> {
        self.turn
    }

    #[must_use]
    pub fn winner(&self) -> Option<Role> {
        self.winner
    }

    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.is_draw
    }

    /// True once a line is complete or the board is full.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.winner.is_some() || self.is_draw
    }

    #[must_use]
    pub fn player1(&self) -> Option<Role> {
        self.player1
    }

    #[must_use]
    pub fn player2(&self) -> Option<Role> {
        self.player2
    }

    #[must_use]
    pub fn player1_name(&self) -> Option<&str> {
        self.player1_name.as_deref()
    }

    #[must_use]
    pub fn player2_name(&self) -> Option<&str> {
        self.player2_name.as_deref()
    }

    /// Record that a connection now occupies the seat for `role`.
    pub fn seat(&mut self, role: Role) {
        match role {
            Role::First => self.player1 = Some(role),
            Role::Second => self.player2 = Some(role),
        }
    }

    /// Record the display name of the joining participant.
    pub fn set_player2_name(&mut self, name: impl Into<String>) {
        self.player2_name = Some(name.into());
    }

    /// Clear the board, winner and draw flag; `X` moves next.
    ///
    /// Both participants keep their seats and names.
    pub fn restart(&mut self) {
        self.board = Board::new();
        self.turn = Some(Role::First);
        self.winner = None;
        self.is_draw = false;
    }

    /// Forget the second participant's seat and name.
    pub fn vacate_second_seat(&mut self) {
        self.player2 = None;
        self.player2_name = None;
    }
}
