//! Game server models.
//!
//! Identifier newtypes and the HTTP request and response bodies.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum display name length, in characters.
pub const MAX_PLAYER_NAME_LENGTH: usize = 64;

/// Opaque game identifier, a lowercase hex token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Encode random bytes as an identifier.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for GameId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for GameId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-assigned identifier for one WebSocket connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn validate_name(name: &str) -> Result<(), &'static str> {
    let name = name.trim();

    if name.is_empty() {
        return Err("Name is required");
    }

    if name.chars().count() > MAX_PLAYER_NAME_LENGTH {
        return Err("Name must be at most 64 characters");
    }

    Ok(())
}

/// Request body for `POST /create`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateGameRequest {
    /// Creator's display name.
    #[serde(default)]
    pub name: String,
}

impl CreateGameRequest {
    /// Validate the request fields.
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_name(&self.name)
    }
}

/// Request body for `POST /join`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JoinGameRequest {
    /// Joiner's display name.
    #[serde(default)]
    pub name: String,

    /// Game to join.
    #[serde(default, rename = "gameId", alias = "gameID", alias = "game_id")]
    pub game_id: String,
}

impl JoinGameRequest {
    /// Validate the request fields.
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_name(&self.name)?;

        if self.game_id.trim().is_empty() {
            return Err("Game ID is required");
        }

        Ok(())
    }
}

/// Response body for create and join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameIdResponse {
    pub game_id: GameId,
}

/// Health check response.
///
/// Returned by the `/health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service health status.
    pub status: String,

    /// Number of games currently held in memory.
    pub active_games: usize,
}
