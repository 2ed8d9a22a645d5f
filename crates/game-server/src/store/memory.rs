//! In-memory game store.

use super::GameStore;
use crate::errors::SessionError;
use crate::models::GameId;
use game_rules::Game;
use ring::rand::{SecureRandom, SystemRandom};
use std::collections::HashMap;
use tokio::time::Instant;

/// Attempts at drawing an unused identifier before giving up.
const MAX_ID_ATTEMPTS: usize = 8;

/// Participants a game can seat.
const MAX_SEATS: usize = 2;

struct Entry {
    game: Game,
    last_activity: Instant,
}

/// Process-local [`GameStore`]. Games are lost on restart.
pub struct MemoryGameStore {
    games: HashMap<GameId, Entry>,
    rng: SystemRandom,
    id_bytes: usize,
}

impl MemoryGameStore {
    /// Create an empty store whose identifiers carry `id_bytes` random bytes.
    #[must_use]
    pub fn new(id_bytes: usize) -> Self {
        Self {
            games: HashMap::new(),
            rng: SystemRandom::new(),
            id_bytes,
        }
    }

    fn generate_id(&self) -> Result<GameId, SessionError> {
        let mut bytes = vec![0u8; self.id_bytes];

        for _ in 0..MAX_ID_ATTEMPTS {
            self.rng.fill(&mut bytes).map_err(|_| {
                tracing::error!(target: "gs.store", "Failed to generate random bytes");
                SessionError::IdAllocation
            })?;

            let id = GameId::from_bytes(&bytes);
            if !self.games.contains_key(&id) {
                return Ok(id);
            }

            tracing::debug!(target: "gs.store", game_id = %id, "Game ID collision, retrying");
        }

        tracing::error!(
            target: "gs.store",
            attempts = MAX_ID_ATTEMPTS,
            "Exhausted attempts to find an unused game ID"
        );
        Err(SessionError::IdAllocation)
    }

    fn entry_mut(&mut self, id: &GameId) -> Result<&mut Entry, SessionError> {
        let entry = self.games.get_mut(id).ok_or(SessionError::NotFound)?;
        entry.last_activity = Instant::now();
        Ok(entry)
    }
}

impl GameStore for MemoryGameStore {
    fn create(&mut self, creator_name: &str) -> Result<GameId, SessionError> {
        let id = self.generate_id()?;
        self.games.insert(
            id.clone(),
            Entry {
                game: Game::new(creator_name),
                last_activity: Instant::now(),
            },
        );
        Ok(id)
    }

    fn get(&self, id: &GameId) -> Option<&Game> {
        self.games.get(id).map(|entry| &entry.game)
    }

    fn join(
        &mut self,
        id: &GameId,
        joiner_name: &str,
        seats_taken: usize,
    ) -> Result<(), SessionError> {
        let entry = self.entry_mut(id)?;

        if seats_taken >= MAX_SEATS || entry.game.player2_name().is_some() {
            return Err(SessionError::Full);
        }

        entry.game.set_player2_name(joiner_name);
        Ok(())
    }

    fn mutate<R>(
        &mut self,
        id: &GameId,
        f: impl FnOnce(&mut Game) -> R,
    ) -> Result<R, SessionError> {
        let entry = self.entry_mut(id)?;
        Ok(f(&mut entry.game))
    }

    fn reset(&mut self, id: &GameId) -> Result<(), SessionError> {
        self.mutate(id, |game| {
            game.restart();
            game.vacate_second_seat();
        })
    }

    fn delete(&mut self, id: &GameId) -> Option<Game> {
        self.games.remove(id).map(|entry| entry.game)
    }

    fn len(&self) -> usize {
        self.games.len()
    }

    fn ids(&self) -> Vec<GameId> {
        self.games.keys().cloned().collect()
    }

    fn idle_since(&self, id: &GameId) -> Option<Instant> {
        self.games.get(id).map(|entry| entry.last_activity)
    }
}
