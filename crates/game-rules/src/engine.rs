//! Move application and end-of-game detection.

use crate::board::Board;
use crate::game::Game;
use crate::role::Role;
use thiserror::Error;

/// The eight lines that win a game: three rows, three columns, two diagonals.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Result of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Marker placed, play continues with `next`.
    Placed { next: Role },
    /// Marker completed a line.
    Won(Role),
    /// Marker filled the board without completing a line.
    Draw,
}

/// Reasons a move is declined. The game is never mutated on error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("cell {cell} is not on the board")]
    OutOfRange { cell: usize },

    #[error("cell {cell} is already occupied")]
    Occupied { cell: usize },

    #[error("game is already finished")]
    Finished,
}

impl RuleViolation {
    /// Short label for logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RuleViolation::OutOfRange { .. } => "out_of_range",
            RuleViolation::Occupied { .. } => "occupied",
            RuleViolation::Finished => "finished",
        }
    }
}

/// Place the current turn's marker at `cell`.
///
/// Win is evaluated before draw, so a final move that both completes a line
/// and fills the board is a win. The turn only advances when neither holds.
///
/// # Errors
///
/// `Finished` if the game already has a winner or is drawn, `OutOfRange` if
/// `cell` is not on the board, `Occupied` if the cell holds a marker.
pub fn apply_move(game: &mut Game, cell: usize) -> Result<MoveOutcome, RuleViolation> {
    let mover = match game.turn {
        Some(role) if !game.is_finished() => role,
        _ => return Err(RuleViolation::Finished),
    };

    game.board.place(cell, mover)?;

    if check_win(&game.board, mover) {
        game.winner = Some(mover);
        game.turn = None;
        return Ok(MoveOutcome::Won(mover));
    }

    if check_draw(&game.board) {
        game.is_draw = true;
        game.turn = None;
        return Ok(MoveOutcome::Draw);
    }

    let next = mover.opponent();
    game.turn = Some(next);
    Ok(MoveOutcome::Placed { next })
}

/// True if any winning line is uniformly held by `role`.
#[must_use]
pub fn check_win(board: &Board, role: Role) -> bool {
    WINNING_LINES
        .iter()
        .any(|line| line.iter().all(|&cell| board.get(cell) == Some(role)))
}

/// True iff no empty cell remains.
#[must_use]
pub fn check_draw(board: &Board) -> bool {
    board.is_full()
}
