//! In-memory session registry.

use super::{Connection, SessionRegistry, MAX_PARTICIPANTS};
use crate::errors::SessionError;
use crate::models::{ConnectionId, GameId};
use game_rules::Role;
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Process-local [`SessionRegistry`].
#[derive(Default)]
pub struct MemorySessionRegistry {
    games: HashMap<GameId, Vec<Connection>>,
    owners: HashMap<ConnectionId, GameId>,
}

impl MemorySessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRegistry for MemorySessionRegistry {
    fn open(&mut self, game_id: GameId) {
        self.games.entry(game_id).or_default();
    }

    fn close(&mut self, game_id: &GameId) -> Vec<Connection> {
        let connections = self.games.remove(game_id).unwrap_or_default();
        for conn in &connections {
            self.owners.remove(&conn.id);
        }
        connections
    }

    fn admit(
        &mut self,
        game_id: &GameId,
        connection_id: ConnectionId,
        outbox: mpsc::Sender<String>,
    ) -> Result<Role, SessionError> {
        let connections = self.games.get_mut(game_id).ok_or(SessionError::NotFound)?;

        if connections.len() >= MAX_PARTICIPANTS {
            return Err(SessionError::Full);
        }

        let role = if connections.iter().any(|c| c.role == Role::First) {
            Role::Second
        } else {
            Role::First
        };

        connections.push(Connection {
            id: connection_id,
            game_id: game_id.clone(),
            role,
            outbox,
        });
        self.owners.insert(connection_id, game_id.clone());

        Ok(role)
    }

    fn remove(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        let game_id = self.owners.remove(&connection_id)?;
        let connections = self.games.get_mut(&game_id)?;
        let index = connections.iter().position(|c| c.id == connection_id)?;
        Some(connections.swap_remove(index))
    }

    fn lookup(&self, connection_id: ConnectionId) -> Option<&Connection> {
        let game_id = self.owners.get(&connection_id)?;
        self.games
            .get(game_id)?
            .iter()
            .find(|c| c.id == connection_id)
    }

    fn count(&self, game_id: &GameId) -> usize {
        self.games.get(game_id).map_or(0, Vec::len)
    }

    fn recipients(&self, game_id: &GameId) -> &[Connection] {
        self.games
            .get(game_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn total(&self) -> usize {
        self.owners.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn outbox() -> mpsc::Sender<String> {
        mpsc::channel(1).0
    }

    fn open_game(registry: &mut MemorySessionRegistry) -> GameId {
        let id = GameId::from("g1");
        registry.open(id.clone());
        id
    }

    #[test]
    fn test_admit_assigns_x_then_o() {
        let mut registry = MemorySessionRegistry::new();
        let game = open_game(&mut registry);

        assert_eq!(
            registry.admit(&game, ConnectionId::new(), outbox()),
            Ok(Role::First)
        );
        assert_eq!(
            registry.admit(&game, ConnectionId::new(), outbox()),
            Ok(Role::Second)
        );
        assert_eq!(registry.count(&game), 2);
        assert_eq!(registry.total(), 2);
    }

    #[test]
    fn test_admit_third_is_full() {
        let mut registry = MemorySessionRegistry::new();
        let game = open_game(&mut registry);
        registry.admit(&game, ConnectionId::new(), outbox()).unwrap();
        registry.admit(&game, ConnectionId::new(), outbox()).unwrap();

        let third = ConnectionId::new();
        assert_eq!(
            registry.admit(&game, third, outbox()),
            Err(SessionError::Full)
        );
        assert!(registry.lookup(third).is_none());
        assert_eq!(registry.count(&game), 2);
    }

    #[test]
    fn test_admit_unknown_game() {
        let mut registry = MemorySessionRegistry::new();
        assert_eq!(
            registry.admit(&GameId::from("nope"), ConnectionId::new(), outbox()),
            Err(SessionError::NotFound)
        );
    }

    #[test]
    fn test_vacated_x_is_reassigned() {
        let mut registry = MemorySessionRegistry::new();
        let game = open_game(&mut registry);
        let x = ConnectionId::new();
        registry.admit(&game, x, outbox()).unwrap();
        registry.admit(&game, ConnectionId::new(), outbox()).unwrap();

        registry.remove(x).unwrap();

        assert_eq!(
            registry.admit(&game, ConnectionId::new(), outbox()),
            Ok(Role::First)
        );
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = MemorySessionRegistry::new();
        let game = open_game(&mut registry);
        let conn = ConnectionId::new();
        registry.admit(&game, conn, outbox()).unwrap();

        let removed = registry.remove(conn).unwrap();
        assert_eq!(removed.game_id, game);
        assert_eq!(removed.role, Role::First);

        assert!(registry.remove(conn).is_none());
        assert_eq!(registry.count(&game), 0);
    }

    #[test]
    fn test_lookup_and_recipients() {
        let mut registry = MemorySessionRegistry::new();
        let game = open_game(&mut registry);
        let conn = ConnectionId::new();
        registry.admit(&game, conn, outbox()).unwrap();

        let found = registry.lookup(conn).unwrap();
        assert_eq!(found.game_id, game);
        assert_eq!(found.role, Role::First);

        assert_eq!(registry.recipients(&game).len(), 1);
        assert!(registry.recipients(&GameId::from("other")).is_empty());
    }

    #[test]
    fn test_close_returns_connections_and_forgets_them() {
        let mut registry = MemorySessionRegistry::new();
        let game = open_game(&mut registry);
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        registry.admit(&game, a, outbox()).unwrap();
        registry.admit(&game, b, outbox()).unwrap();

        let closed = registry.close(&game);

        assert_eq!(closed.len(), 2);
        assert_eq!(registry.total(), 0);
        assert!(registry.lookup(a).is_none());
        assert!(registry.remove(b).is_none());
        assert_eq!(registry.count(&game), 0);
        assert_eq!(
            registry.admit(&game, ConnectionId::new(), outbox()),
            Err(SessionError::NotFound)
        );
    }
}
