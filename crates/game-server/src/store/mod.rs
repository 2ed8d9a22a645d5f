//! Game storage.
//!
//! The store owns every [`Game`] record keyed by [`GameId`]. It is not
//! synchronized itself; the lifecycle coordinator holds it behind the same
//! lock as the session registry so the two never disagree about which games
//! exist.

mod memory;

pub use memory::MemoryGameStore;

use crate::errors::SessionError;
use crate::models::GameId;
use game_rules::Game;
use tokio::time::Instant;

/// Keyed collection of games.
pub trait GameStore: Send + 'static {
    /// Insert a fresh game for `creator_name` under a new unique identifier.
    fn create(&mut self, creator_name: &str) -> Result<GameId, SessionError>;

    fn get(&self, id: &GameId) -> Option<&Game>;

    /// Record the joining participant's name.
    ///
    /// `seats_taken` is the number of live connections the caller holds for
    /// this game. The join is refused as `Full` if two are already admitted
    /// or the second seat has already been claimed by name.
    fn join(&mut self, id: &GameId, joiner_name: &str, seats_taken: usize)
        -> Result<(), SessionError>;

    /// Apply `f` to the stored game and return its result.
    fn mutate<R>(&mut self, id: &GameId, f: impl FnOnce(&mut Game) -> R)
        -> Result<R, SessionError>;

    /// Restart the round and forget the second participant.
    fn reset(&mut self, id: &GameId) -> Result<(), SessionError>;

    fn delete(&mut self, id: &GameId) -> Option<Game>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ids(&self) -> Vec<GameId>;

    /// Time of the last create, join or mutation of this game.
    fn idle_since(&self, id: &GameId) -> Option<Instant>;
}
