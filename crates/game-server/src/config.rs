//! Game server configuration.
//!
//! Configuration is loaded from environment variables. Every field has a
//! default so the server starts with no environment at all.

use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default HTTP/WebSocket bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Default number of random bytes in a game identifier (128 bits).
pub const DEFAULT_GAME_ID_BYTES: usize = 16;

/// Smallest accepted identifier size (24 bits, six hex characters).
pub const MIN_GAME_ID_BYTES: usize = 3;

/// Largest accepted identifier size.
pub const MAX_GAME_ID_BYTES: usize = 32;

/// Default per-connection outbound buffer, in messages.
pub const DEFAULT_OUTBOX_CAPACITY: usize = 32;

/// Default idle time before an unattended game is removed.
pub const DEFAULT_IDLE_GAME_TTL_SECONDS: u64 = 600;

/// Default idle-game reaper check interval.
pub const DEFAULT_REAPER_INTERVAL_SECONDS: u64 = 60;

/// Game server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:3000").
    pub bind_address: String,

    /// Random bytes per game identifier. The identifier is rendered as
    /// lowercase hex, so its length is twice this value.
    pub game_id_bytes: usize,

    /// Capacity of each connection's outbound queue. A peer that falls this
    /// far behind starts losing broadcasts instead of stalling the game.
    pub outbox_capacity: usize,

    /// Seconds a game with no connections may sit idle before the reaper
    /// removes it.
    pub idle_game_ttl_seconds: u64,

    /// Seconds between reaper passes.
    pub reaper_interval_seconds: u64,

    /// Seconds to wait for in-flight connections after a shutdown signal.
    pub drain_seconds: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid game ID size configuration: {0}")]
    InvalidGameIdBytes(String),

    #[error("Invalid outbox capacity configuration: {0}")]
    InvalidOutboxCapacity(String),

    #[error("Invalid duration configuration: {0}")]
    InvalidDuration(String),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            game_id_bytes: DEFAULT_GAME_ID_BYTES,
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
            idle_game_ttl_seconds: DEFAULT_IDLE_GAME_TTL_SECONDS,
            reaper_interval_seconds: DEFAULT_REAPER_INTERVAL_SECONDS,
            drain_seconds: 0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        // Parse identifier size with validation
        let game_id_bytes = if let Some(value_str) = vars.get("GAME_ID_BYTES") {
            let value: usize = value_str.parse().map_err(|e| {
                ConfigError::InvalidGameIdBytes(format!(
                    "GAME_ID_BYTES must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if !(MIN_GAME_ID_BYTES..=MAX_GAME_ID_BYTES).contains(&value) {
                return Err(ConfigError::InvalidGameIdBytes(format!(
                    "GAME_ID_BYTES must be between {} and {}, got {}",
                    MIN_GAME_ID_BYTES, MAX_GAME_ID_BYTES, value
                )));
            }

            value
        } else {
            DEFAULT_GAME_ID_BYTES
        };

        let outbox_capacity = if let Some(value_str) = vars.get("OUTBOX_CAPACITY") {
            let value: usize = value_str.parse().map_err(|e| {
                ConfigError::InvalidOutboxCapacity(format!(
                    "OUTBOX_CAPACITY must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidOutboxCapacity(
                    "OUTBOX_CAPACITY must be greater than 0".to_string(),
                ));
            }

            value
        } else {
            DEFAULT_OUTBOX_CAPACITY
        };

        let idle_game_ttl_seconds = parse_positive_seconds(
            vars,
            "IDLE_GAME_TTL_SECONDS",
            DEFAULT_IDLE_GAME_TTL_SECONDS,
        )?;

        let reaper_interval_seconds = parse_positive_seconds(
            vars,
            "REAPER_INTERVAL_SECONDS",
            DEFAULT_REAPER_INTERVAL_SECONDS,
        )?;

        // Zero is allowed here: it skips the drain period entirely
        let drain_seconds = match vars.get("DRAIN_SECONDS") {
            Some(value_str) => value_str.parse().map_err(|e| {
                ConfigError::InvalidDuration(format!(
                    "DRAIN_SECONDS must be a valid integer, got '{}': {}",
                    value_str, e
                ))
            })?,
            None => 0,
        };

        Ok(Config {
            bind_address,
            game_id_bytes,
            outbox_capacity,
            idle_game_ttl_seconds,
            reaper_interval_seconds,
            drain_seconds,
        })
    }

    #[must_use]
    pub fn idle_game_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_game_ttl_seconds)
    }

    #[must_use]
    pub fn reaper_interval(&self) -> Duration {
        Duration::from_secs(self.reaper_interval_seconds)
    }
}

fn parse_positive_seconds(
    vars: &HashMap<String, String>,
    key: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    let Some(value_str) = vars.get(key) else {
        return Ok(default);
    };

    let value: u64 = value_str.parse().map_err(|e| {
        ConfigError::InvalidDuration(format!(
            "{} must be a valid positive integer, got '{}': {}",
            key, value_str, e
        ))
    })?;

    if value == 0 {
        return Err(ConfigError::InvalidDuration(format!(
            "{} must be greater than 0",
            key
        )));
    }

    Ok(value)
}
