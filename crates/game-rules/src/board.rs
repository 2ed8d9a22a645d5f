//! Nine-cell tic-tac-toe board.
//!
//! Cells are indexed row-major:
//!
//! ```text
//!  0 | 1 | 2
//! ---+---+---
//!  3 | 4 | 5
//! ---+---+---
//!  6 | 7 | 8
//! ```
//!
//! On the wire the board is an array of nine strings, `""` for an empty
//! cell and the role marker otherwise.

use crate::engine::RuleViolation;
use crate::role::Role;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Fixed-size board. Each cell is written at most once per game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board([Option<Role>; CELL_COUNT]);

impl Board {
    /// Create an empty board.
    #[must_use]
    pub const fn new() -> Self {
        Self([None; CELL_COUNT])
    }

    /// Marker at `cell`, `None` if empty or out of range.
    #[must_use]
    pub fn get(&self, cell: usize) -> Option<Role> {
        self.0.get(cell).copied().flatten()
    }

    /// Place `role` at `cell`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `cell` is not on the board and `Occupied` if
    /// the cell already holds a marker. The board is unchanged on error.
    pub fn place(&mut self, cell: usize, role: Role) -> Result<(), RuleViolation> {
        let slot = self
            .0
            .get_mut(cell)
            .ok_or(RuleViolation::OutOfRange { cell })?;
        if slot.is_some() {
            return Err(RuleViolation::Occupied { cell });
        }
        *slot = Some(role);
        Ok(())
    }

    /// True when no empty cell remains.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.0.iter().filter(|c| c.is_some()).count()
    }

    /// All cells in index order.
    #[must_use]
    pub fn cells(&self) -> &[Option<Role>; CELL_COUNT] {
        &self.0
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|cell| cell.map_or("", Role::marker)))
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        if raw.len() != CELL_COUNT {
            return Err(D::Error::invalid_length(raw.len(), &"9 cells"));
        }

        let mut board = Board::new();
        for (slot, marker) in board.0.iter_mut().zip(raw.iter()) {
            *slot = match marker.as_str() {
                "" => None,
                other => Some(Role::from_marker(other).ok_or_else(|| {
                    D::Error::custom(format!("invalid cell marker '{other}'"))
                })?),
            };
        }
        Ok(board)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.occupied(), 0);
        assert!(!board.is_full());
        assert!((0..CELL_COUNT).all(|c| board.get(c).is_none()));
    }

    #[test]
    fn test_place_rejects_occupied_and_out_of_range() {
        let mut board = Board::new();
        board.place(4, Role::First).unwrap();

        assert_eq!(
            board.place(4, Role::Second),
            Err(RuleViolation::Occupied { cell: 4 })
        );
        assert_eq!(
            board.place(9, Role::Second),
            Err(RuleViolation::OutOfRange { cell: 9 })
        );
        assert_eq!(board.get(4), Some(Role::First));
        assert_eq!(board.occupied(), 1);
    }

    #[test]
    fn test_get_out_of_range_is_none() {
        let board = Board::new();
        assert_eq!(board.get(100), None);
    }

    #[test]
    fn test_wire_format() {
        let mut board = Board::new();
        board.place(0, Role::First).unwrap();
        board.place(8, Role::Second).unwrap();

        let json = serde_json::to_value(board).unwrap();
        assert_eq!(
            json,
            serde_json::json!(["X", "", "", "", "", "", "", "", "O"])
        );

        let parsed: Board = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn test_deserialize_rejects_bad_input() {
        assert!(serde_json::from_str::<Board>(r#"["X","O"]"#).is_err());
        assert!(serde_json::from_str::<Board>(r#"["Z","","","","","","","",""]"#).is_err());
    }
}
