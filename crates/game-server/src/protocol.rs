//! WebSocket message formats.
//!
//! Inbound frames are JSON envelopes tagged by `type`:
//!
//! ```json
//! {"type": "move", "player": "X", "cell": 4}
//! {"type": "reset"}
//! {"type": "leave_game"}
//! ```
//!
//! The `player` field is accepted but ignored; the sender's role always
//! comes from its connection. Outbound frames are either the serialized
//! [`game_rules::Game`] or a [`ControlMessage`].

use serde::{Deserialize, Serialize};

/// Message received from a participant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Place the sender's marker. `cell` is kept signed so that negative
    /// values decode and are rejected by validation rather than by serde.
    Move {
        #[serde(default)]
        cell: Option<i64>,
    },
    /// Start a new round with the same participants.
    Reset,
    /// Depart the game explicitly.
    LeaveGame,
}

impl ClientMessage {
    /// Decode a text frame. Returns `None` for anything that is not a known
    /// message type.
    #[must_use]
    pub fn parse(frame: &str) -> Option<Self> {
        serde_json::from_str(frame).ok()
    }

    /// Label for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Move { .. } => "move",
            ClientMessage::Reset => "reset",
            ClientMessage::LeaveGame => "leave_game",
        }
    }
}

/// Non-state message pushed to participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Tell the client to navigate away; the game is gone.
    Redirect { url: String },
}

impl ControlMessage {
    /// Redirect to the landing page.
    #[must_use]
    pub fn redirect_home() -> Self {
        ControlMessage::Redirect {
            url: "/".to_string(),
        }
    }
}
