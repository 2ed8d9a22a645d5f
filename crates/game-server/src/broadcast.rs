//! Fan-out of outbound frames to a game's connections.
//!
//! Each payload is serialized once and offered to every recipient's outbox
//! with `try_send`. A recipient whose outbox is full or closed loses that
//! message; the others are unaffected and nothing is retried. These
//! functions never await, so the coordinator calls them while holding its
//! lock.

use crate::models::GameId;
use crate::observability::metrics;
use crate::protocol::ControlMessage;
use crate::registry::Connection;
use game_rules::Game;
use serde::Serialize;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, warn};

/// Send the full game record to every recipient.
///
/// Returns the number of recipients the frame was queued for.
pub fn broadcast_state(game_id: &GameId, recipients: &[Connection], game: &Game) -> usize {
    deliver(game_id, recipients, game, "state")
}

/// Send a control message to every recipient.
pub fn broadcast_control(
    game_id: &GameId,
    recipients: &[Connection],
    message: &ControlMessage,
) -> usize {
    deliver(game_id, recipients, message, "control")
}

fn deliver<T: Serialize>(
    game_id: &GameId,
    recipients: &[Connection],
    payload: &T,
    kind: &'static str,
) -> usize {
    let frame = match serde_json::to_string(payload) {
        Ok(frame) => frame,
        Err(e) => {
            error!(
                target: "gs.broadcast",
                game_id = %game_id,
                kind,
                error = %e,
                "Failed to serialize broadcast"
            );
            metrics::record_broadcast_failure("serialize");
            return 0;
        }
    };

    let mut delivered = 0;
    for conn in recipients {
        match conn.outbox.try_send(frame.clone()) {
            Ok(()) => delivered += 1,
            Err(TrySendError::Full(_)) => {
                warn!(
                    target: "gs.broadcast",
                    game_id = %game_id,
                    connection_id = %conn.id,
                    role = %conn.role,
                    kind,
                    "Outbox full, dropping message"
                );
                metrics::record_broadcast_failure("full");
            }
            Err(TrySendError::Closed(_)) => {
                warn!(
                    target: "gs.broadcast",
                    game_id = %game_id,
                    connection_id = %conn.id,
                    role = %conn.role,
                    kind,
                    "Outbox closed, dropping message"
                );
                metrics::record_broadcast_failure("closed");
            }
        }
    }

    debug!(
        target: "gs.broadcast",
        game_id = %game_id,
        kind,
        delivered,
        recipients = recipients.len(),
        "Broadcast complete"
    );

    delivered
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::ConnectionId;
    use game_rules::Role;
    use tokio::sync::mpsc;

    fn connection(role: Role, capacity: usize) -> (Connection, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        let conn = Connection {
            id: ConnectionId::new(),
            game_id: GameId::from("g1"),
            role,
            outbox: tx,
        };
        (conn, rx)
    }

    #[test]
    fn test_state_reaches_every_recipient() {
        let (x, mut x_rx) = connection(Role::First, 4);
        let (o, mut o_rx) = connection(Role::Second, 4);
        let game = Game::new("Alice");

        let delivered = broadcast_state(&GameId::from("g1"), &[x, o], &game);

        assert_eq!(delivered, 2);
        let x_frame: serde_json::Value = serde_json::from_str(&x_rx.try_recv().unwrap()).unwrap();
        let o_frame = o_rx.try_recv().unwrap();
        assert_eq!(x_frame["player1_name"], "Alice");
        assert_eq!(serde_json::to_string(&game).unwrap(), o_frame);
    }

    #[test]
    fn test_full_outbox_does_not_block_others() {
        let (slow, mut slow_rx) = connection(Role::First, 1);
        let (fast, mut fast_rx) = connection(Role::Second, 4);
        slow.outbox.try_send("backlog".to_string()).unwrap();

        let delivered = broadcast_control(
            &GameId::from("g1"),
            &[slow, fast],
            &ControlMessage::redirect_home(),
        );

        assert_eq!(delivered, 1);
        assert_eq!(slow_rx.try_recv().unwrap(), "backlog");
        assert!(slow_rx.try_recv().is_err());
        assert_eq!(fast_rx.try_recv().unwrap(), r#"{"type":"redirect","url":"/"}"#);
    }

    #[test]
    fn test_closed_outbox_is_skipped() {
        let (gone, gone_rx) = connection(Role::First, 4);
        let (alive, mut alive_rx) = connection(Role::Second, 4);
        drop(gone_rx);

        let delivered = broadcast_state(&GameId::from("g1"), &[gone, alive], &Game::new("A"));

        assert_eq!(delivered, 1);
        assert!(alive_rx.try_recv().is_ok());
    }

    #[test]
    fn test_no_recipients() {
        assert_eq!(
            broadcast_state(&GameId::from("g1"), &[], &Game::new("A")),
            0
        );
    }
}
