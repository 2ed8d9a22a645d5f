//! Participant roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two sides of a game.
///
/// The first admitted connection always plays [`Role::First`] (marker `X`)
/// and moves first; the second plays [`Role::Second`] (marker `O`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Creator's side, marker `X`.
    #[serde(rename = "X")]
    First,
    /// Joiner's side, marker `O`.
    #[serde(rename = "O")]
    Second,
}

impl Role {
    /// Wire marker for this role.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Role::First => "X",
            Role::Second => "O",
        }
    }

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Role {
        match self {
            Role::First => Role::Second,
            Role::Second => Role::First,
        }
    }

    /// Parse a wire marker.
    #[must_use]
    pub fn from_marker(marker: &str) -> Option<Role> {
        match marker {
            "X" => Some(Role::First),
            "O" => Some(Role::Second),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_markers() {
        assert_eq!(Role::First.marker(), "X");
        assert_eq!(Role::Second.marker(), "O");
        assert_eq!(Role::from_marker("X"), Some(Role::First));
        assert_eq!(Role::from_marker("O"), Some(Role::Second));
        assert_eq!(Role::from_marker("x"), None);
        assert_eq!(Role::from_marker(""), None);
    }

    #[test]
    fn test_opponent_alternates() {
        assert_eq!(Role::First.opponent(), Role::Second);
        assert_eq!(Role::Second.opponent(), Role::First);
        assert_eq!(Role::First.opponent().opponent(), Role::First);
    }

    #[test]
    fn test_serializes_as_marker() {
        assert_eq!(serde_json::to_string(&Role::First).unwrap(), "\"X\"");
        assert_eq!(serde_json::to_string(&Role::Second).unwrap(), "\"O\"");
        let parsed: Role = serde_json::from_str("\"O\"").unwrap();
        assert_eq!(parsed, Role::Second);
    }
}
