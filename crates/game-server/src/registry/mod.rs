//! Live connection bookkeeping.
//!
//! The registry tracks which WebSocket connections belong to which game and
//! the role each one plays. Like the game store it is unsynchronized and
//! lives behind the lifecycle coordinator's lock.

mod memory;

pub use memory::MemorySessionRegistry;

use crate::errors::SessionError;
use crate::models::{ConnectionId, GameId};
use game_rules::Role;
use tokio::sync::mpsc;

/// Connections a single game admits.
pub const MAX_PARTICIPANTS: usize = 2;

/// One admitted participant connection.
///
/// `outbox` feeds the connection's writer task. Dropping the last
/// `Connection` for a socket closes its outbox, which ends the writer.
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub game_id: GameId,
    pub role: Role,
    pub outbox: mpsc::Sender<String>,
}

/// Game-to-connection bookkeeping.
pub trait SessionRegistry: Send + 'static {
    /// Start tracking connections for a newly created game.
    fn open(&mut self, game_id: GameId);

    /// Stop tracking a game, returning the connections it still had.
    fn close(&mut self, game_id: &GameId) -> Vec<Connection>;

    /// Admit a connection and assign its role.
    ///
    /// The connection plays `X` unless a live connection already holds `X`.
    fn admit(
        &mut self,
        game_id: &GameId,
        connection_id: ConnectionId,
        outbox: mpsc::Sender<String>,
    ) -> Result<Role, SessionError>;

    /// Forget a connection. Removing an unknown connection returns `None`.
    fn remove(&mut self, connection_id: ConnectionId) -> Option<Connection>;

    fn lookup(&self, connection_id: ConnectionId) -> Option<&Connection>;

    /// Live connections for `game_id`; zero for an unknown game.
    fn count(&self, game_id: &GameId) -> usize;

    /// Connections that should receive broadcasts for `game_id`.
    fn recipients(&self, game_id: &GameId) -> &[Connection];

    /// Live connections across all games.
    fn total(&self) -> usize;
}
