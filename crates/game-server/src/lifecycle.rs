//! Lifecycle coordinator.
//!
//! Every event that changes a game (create, join, connect, move, reset,
//! leave, disconnect, reap) runs here as one critical section over the game
//! store and session registry together. Broadcasts are issued from inside
//! the critical section with non-blocking sends, so the order in which
//! participants observe states matches the order transitions were applied,
//! and a deleted game is never followed by a state broadcast.
//!
//! # Departures
//!
//! | Who leaves | How | Effect |
//! |------------|-----|--------|
//! | last participant | disconnect | game deleted |
//! | `X` | disconnect or `leave_game` | redirect to everyone, game deleted |
//! | `O` | disconnect or `leave_game` | round restarted, second seat cleared |

use crate::broadcast::{broadcast_control, broadcast_state};
use crate::config::Config;
use crate::errors::SessionError;
use crate::models::{ConnectionId, GameId};
use crate::observability::metrics;
use crate::protocol::{ClientMessage, ControlMessage};
use crate::registry::{MemorySessionRegistry, SessionRegistry};
use crate::store::{GameStore, MemoryGameStore};
use game_rules::{apply_move, Game, MoveOutcome, Role, RuleViolation};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, instrument};

/// Why a move was ignored. Never reported to the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejected {
    #[error("connection is not part of a game")]
    UnknownConnection,

    #[error("it is not the sender's turn")]
    NotYourTurn,

    #[error("cell is missing or negative")]
    InvalidCell,

    #[error(transparent)]
    Rule(#[from] RuleViolation),
}

impl MoveRejected {
    /// Label for logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            MoveRejected::UnknownConnection => "unknown_connection",
            MoveRejected::NotYourTurn => "not_your_turn",
            MoveRejected::InvalidCell => "invalid_cell",
            MoveRejected::Rule(violation) => violation.as_str(),
        }
    }
}

/// What a departure did to its game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// Nobody was left; the game was deleted.
    Emptied,
    /// The creator left; the opponent was redirected and the game deleted.
    CreatorLeft,
    /// The opponent left; the round was restarted for the creator.
    OpponentLeft,
}

struct Tables<S, R> {
    games: S,
    sessions: R,
}

/// Serializes all game transitions behind one lock.
pub struct LifecycleCoordinator<S = MemoryGameStore, R = MemorySessionRegistry> {
    tables: Mutex<Tables<S, R>>,
    outbox_capacity: usize,
}

impl LifecycleCoordinator {
    /// Coordinator over in-memory storage.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            MemoryGameStore::new(config.game_id_bytes),
            MemorySessionRegistry::new(),
            config.outbox_capacity,
        )
    }
}

impl<S: GameStore, R: SessionRegistry> LifecycleCoordinator<S, R> {
    pub fn with_parts(games: S, sessions: R, outbox_capacity: usize) -> Self {
        Self {
            tables: Mutex::new(Tables { games, sessions }),
            outbox_capacity,
        }
    }

    /// Create a game for `creator_name` and open its connection bookkeeping.
    #[instrument(skip_all, name = "gs.lifecycle.create")]
    pub async fn create_game(&self, creator_name: &str) -> Result<GameId, SessionError> {
        let started = std::time::Instant::now();
        let mut tables = self.tables.lock().await;
        let Tables { games, sessions } = &mut *tables;

        let game_id = games.create(creator_name)?;
        sessions.open(game_id.clone());

        metrics::record_game_created();
        metrics::set_active_games(games.len());
        metrics::record_transition("create", started.elapsed());

        info!(target: "gs.lifecycle", game_id = %game_id, "Game created");
        Ok(game_id)
    }

    /// Claim the second seat of `game_id` for `joiner_name`.
    #[instrument(skip_all, name = "gs.lifecycle.join", fields(game_id = %game_id))]
    pub async fn join_game(&self, game_id: &GameId, joiner_name: &str) -> Result<(), SessionError> {
        let started = std::time::Instant::now();
        let mut tables = self.tables.lock().await;
        let Tables { games, sessions } = &mut *tables;

        let seats_taken = sessions.count(game_id);
        games.join(game_id, joiner_name, seats_taken)?;

        metrics::record_transition("join", started.elapsed());
        info!(target: "gs.lifecycle", game_id = %game_id, "Player joined game");
        Ok(())
    }

    /// Admit a new connection to `game_id`.
    ///
    /// On success the connection's seat is recorded, the updated game is
    /// broadcast to every participant (the newcomer included), and the
    /// receiving half of the connection's outbox is returned. On rejection
    /// nothing changes.
    #[instrument(
        skip_all,
        name = "gs.lifecycle.connect",
        fields(game_id = %game_id, connection_id = %connection_id)
    )]
    pub async fn connect(
        &self,
        game_id: &GameId,
        connection_id: ConnectionId,
    ) -> Result<(Role, mpsc::Receiver<String>), SessionError> {
        let started = std::time::Instant::now();
        let mut tables = self.tables.lock().await;
        let Tables { games, sessions } = &mut *tables;

        if games.get(game_id).is_none() {
            metrics::record_connection("not_found");
            debug!(target: "gs.lifecycle", game_id = %game_id, "Connection to unknown game rejected");
            return Err(SessionError::NotFound);
        }

        let (outbox, inbox) = mpsc::channel(self.outbox_capacity);
        let role = match sessions.admit(game_id, connection_id, outbox) {
            Ok(role) => role,
            Err(e) => {
                metrics::record_connection(match e {
                    SessionError::Full => "full",
                    _ => "not_found",
                });
                debug!(target: "gs.lifecycle", game_id = %game_id, error = %e, "Connection rejected");
                return Err(e);
            }
        };

        if let Err(e) = games.mutate(game_id, |game| game.seat(role)) {
            sessions.remove(connection_id);
            return Err(e);
        }

        if let Some(game) = games.get(game_id) {
            broadcast_state(game_id, sessions.recipients(game_id), game);
        }

        metrics::record_connection("admitted");
        metrics::set_active_connections(sessions.total());
        metrics::record_transition("connect", started.elapsed());

        info!(
            target: "gs.lifecycle",
            game_id = %game_id,
            connection_id = %connection_id,
            role = %role,
            "Player connected"
        );
        Ok((role, inbox))
    }

    /// Decode and apply one inbound text frame.
    ///
    /// Frames that do not decode to a known message are dropped.
    pub async fn handle_frame(&self, connection_id: ConnectionId, frame: &str) {
        let Some(message) = ClientMessage::parse(frame) else {
            metrics::record_malformed_message();
            debug!(
                target: "gs.lifecycle",
                connection_id = %connection_id,
                len = frame.len(),
                "Dropping malformed message"
            );
            return;
        };

        match message {
            ClientMessage::Move { cell } => {
                // Rejections are logged and counted inside make_move
                let _ = self.make_move(connection_id, cell).await;
            }
            ClientMessage::Reset => {
                self.reset(connection_id).await;
            }
            ClientMessage::LeaveGame => {
                self.leave(connection_id).await;
            }
        }
    }

    /// Apply a move for the sender's role.
    ///
    /// Accepted moves are broadcast. Rejected moves change nothing and
    /// broadcast nothing.
    #[instrument(skip_all, name = "gs.lifecycle.move", fields(connection_id = %connection_id))]
    pub async fn make_move(
        &self,
        connection_id: ConnectionId,
        cell: Option<i64>,
    ) -> Result<MoveOutcome, MoveRejected> {
        let started = std::time::Instant::now();
        let mut tables = self.tables.lock().await;
        let Tables { games, sessions } = &mut *tables;

        let result = Self::apply(games, sessions, connection_id, cell);
        match &result {
            Ok(outcome) => {
                metrics::record_move("accepted");
                debug!(target: "gs.lifecycle", connection_id = %connection_id, ?outcome, "Move accepted");
            }
            Err(rejected) => {
                metrics::record_move(rejected.as_str());
                debug!(
                    target: "gs.lifecycle",
                    connection_id = %connection_id,
                    reason = rejected.as_str(),
                    "Move ignored"
                );
            }
        }
        metrics::record_transition("move", started.elapsed());
        result
    }

    fn apply(
        games: &mut S,
        sessions: &R,
        connection_id: ConnectionId,
        cell: Option<i64>,
    ) -> Result<MoveOutcome, MoveRejected> {
        let conn = sessions
            .lookup(connection_id)
            .ok_or(MoveRejected::UnknownConnection)?;
        let game_id = &conn.game_id;
        let game = games.get(game_id).ok_or(MoveRejected::UnknownConnection)?;

        if game.is_finished() {
            return Err(RuleViolation::Finished.into());
        }
        if game.turn() != Some(conn.role) {
            return Err(MoveRejected::NotYourTurn);
        }

        let cell = cell
            .and_then(|c| usize::try_from(c).ok())
            .ok_or(MoveRejected::InvalidCell)?;

        let outcome = games
            .mutate(game_id, |game| apply_move(game, cell))
            .map_err(|_| MoveRejected::UnknownConnection)??;

        if let Some(game) = games.get(game_id) {
            broadcast_state(game_id, sessions.recipients(game_id), game);
        }
        Ok(outcome)
    }

    /// Start a new round with both participants kept in their seats.
    #[instrument(skip_all, name = "gs.lifecycle.reset", fields(connection_id = %connection_id))]
    pub async fn reset(&self, connection_id: ConnectionId) {
        let started = std::time::Instant::now();
        let mut tables = self.tables.lock().await;
        let Tables { games, sessions } = &mut *tables;

        let Some(game_id) = sessions.lookup(connection_id).map(|c| c.game_id.clone()) else {
            return;
        };

        if games.mutate(&game_id, Game::restart).is_ok() {
            if let Some(game) = games.get(&game_id) {
                broadcast_state(&game_id, sessions.recipients(&game_id), game);
            }
            info!(target: "gs.lifecycle", game_id = %game_id, "Game reset");
        }
        metrics::record_transition("reset", started.elapsed());
    }

    /// Explicit departure via `leave_game`.
    ///
    /// The departing connection is released; its socket closes once any
    /// queued frames are flushed.
    #[instrument(skip_all, name = "gs.lifecycle.leave", fields(connection_id = %connection_id))]
    pub async fn leave(&self, connection_id: ConnectionId) -> Option<Departure> {
        let started = std::time::Instant::now();
        let mut tables = self.tables.lock().await;
        let Tables { games, sessions } = &mut *tables;

        let (game_id, role) = sessions
            .lookup(connection_id)
            .map(|conn| (conn.game_id.clone(), conn.role))?;

        let departure = match role {
            Role::First => {
                broadcast_control(
                    &game_id,
                    sessions.recipients(&game_id),
                    &ControlMessage::redirect_home(),
                );
                Self::teardown(games, sessions, &game_id, "creator_left");
                Departure::CreatorLeft
            }
            Role::Second => {
                sessions.remove(connection_id);
                Self::vacate_second_seat(games, sessions, &game_id);
                Departure::OpponentLeft
            }
        };

        metrics::set_active_connections(sessions.total());
        metrics::record_transition("leave", started.elapsed());
        info!(
            target: "gs.lifecycle",
            game_id = %game_id,
            connection_id = %connection_id,
            ?departure,
            "Player left game"
        );
        Some(departure)
    }

    /// Socket closed or errored. Unknown connections are ignored, which
    /// makes a disconnect after `leave_game` or teardown a no-op.
    #[instrument(skip_all, name = "gs.lifecycle.disconnect", fields(connection_id = %connection_id))]
    pub async fn disconnect(&self, connection_id: ConnectionId) -> Option<Departure> {
        let started = std::time::Instant::now();
        let mut tables = self.tables.lock().await;
        let Tables { games, sessions } = &mut *tables;

        let conn = sessions.remove(connection_id)?;
        let game_id = conn.game_id.clone();
        drop(conn);

        let departure = if sessions.count(&game_id) == 0 {
            Self::teardown(games, sessions, &game_id, "empty");
            Departure::Emptied
        } else {
            // One connection remains; it holds whichever role the leaver did not
            match sessions.recipients(&game_id).first().map(|c| c.role) {
                Some(Role::Second) => {
                    broadcast_control(
                        &game_id,
                        sessions.recipients(&game_id),
                        &ControlMessage::redirect_home(),
                    );
                    Self::teardown(games, sessions, &game_id, "creator_left");
                    Departure::CreatorLeft
                }
                _ => {
                    Self::vacate_second_seat(games, sessions, &game_id);
                    Departure::OpponentLeft
                }
            }
        };

        metrics::set_active_connections(sessions.total());
        metrics::record_transition("disconnect", started.elapsed());
        info!(
            target: "gs.lifecycle",
            game_id = %game_id,
            connection_id = %connection_id,
            ?departure,
            "Player disconnected"
        );
        Some(departure)
    }

    /// Delete games that have no connections and have been idle for at
    /// least `ttl`. Returns how many were removed.
    pub async fn reap_idle(&self, ttl: Duration) -> usize {
        let mut tables = self.tables.lock().await;
        let Tables { games, sessions } = &mut *tables;
        let now = tokio::time::Instant::now();

        let stale: Vec<GameId> = games
            .ids()
            .into_iter()
            .filter(|id| sessions.count(id) == 0)
            .filter(|id| {
                games
                    .idle_since(id)
                    .is_some_and(|since| now.saturating_duration_since(since) >= ttl)
            })
            .collect();

        for game_id in &stale {
            Self::teardown(games, sessions, game_id, "idle");
            info!(target: "gs.lifecycle", game_id = %game_id, "Idle game removed");
        }

        stale.len()
    }

    /// Copy of the current game record.
    pub async fn snapshot(&self, game_id: &GameId) -> Option<Game> {
        self.tables.lock().await.games.get(game_id).cloned()
    }

    pub async fn connection_count(&self, game_id: &GameId) -> usize {
        self.tables.lock().await.sessions.count(game_id)
    }

    pub async fn active_games(&self) -> usize {
        self.tables.lock().await.games.len()
    }

    fn vacate_second_seat(games: &mut S, sessions: &R, game_id: &GameId) {
        if games.reset(game_id).is_ok() {
            if let Some(game) = games.get(game_id) {
                broadcast_state(game_id, sessions.recipients(game_id), game);
            }
        }
    }

    /// Remove the game and drop every connection's outbox sender.
    fn teardown(games: &mut S, sessions: &mut R, game_id: &GameId, reason: &'static str) {
        games.delete(game_id);
        let released = sessions.close(game_id);

        metrics::record_game_deleted(reason);
        metrics::set_active_games(games.len());
        debug!(
            target: "gs.lifecycle",
            game_id = %game_id,
            reason,
            released = released.len(),
            "Game deleted"
        );
    }
}
