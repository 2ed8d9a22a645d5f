//! WebSocket session handler.
//!
//! Each upgraded socket is split in two. A writer task drains the
//! connection's outbox into the socket and sends a Close frame once the
//! outbox is closed, which happens when the coordinator releases the
//! connection (explicit departure or game teardown). The reader loop feeds
//! inbound text frames to the coordinator until either the peer goes away
//! or the writer finishes.

use crate::lifecycle::LifecycleCoordinator;
use crate::models::{ConnectionId, GameId};
use crate::routes::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures::{Sink, SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// Handler for GET /ws/:game_id
///
/// Upgrades to a WebSocket and admits the connection to the game. If the
/// game does not exist or already has two participants the socket is
/// closed immediately and no state changes.
#[instrument(skip_all, name = "gs.handlers.ws")]
pub async fn game_socket(
    ws: WebSocketUpgrade,
    Path(game_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let coordinator = state.coordinator.clone();
    let game_id = GameId::from(game_id);
    ws.on_upgrade(move |socket| run_session(socket, coordinator, game_id))
}

async fn run_session(socket: WebSocket, coordinator: Arc<LifecycleCoordinator>, game_id: GameId) {
    let connection_id = ConnectionId::new();
    let (mut sink, mut stream) = socket.split();

    let (role, inbox) = match coordinator.connect(&game_id, connection_id).await {
        Ok(admitted) => admitted,
        Err(e) => {
            debug!(
                target: "gs.handlers.ws",
                game_id = %game_id,
                error = %e,
                "Closing rejected connection"
            );
            let _ = sink.send(Message::Close(None)).await;
            return;
        }
    };

    info!(
        target: "gs.handlers.ws",
        game_id = %game_id,
        connection_id = %connection_id,
        role = %role,
        "WebSocket session started"
    );

    let mut writer = tokio::spawn(write_outbox(sink, inbox));

    loop {
        tokio::select! {
            _ = &mut writer => break,
            msg = stream.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    coordinator.handle_frame(connection_id, &text).await;
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Binary, ping and pong frames carry nothing for us
                Some(Ok(_)) => {}
            },
        }
    }

    coordinator.disconnect(connection_id).await;

    info!(
        target: "gs.handlers.ws",
        game_id = %game_id,
        connection_id = %connection_id,
        "WebSocket session ended"
    );
}

/// Forward queued frames until the outbox is closed, then close the socket.
async fn write_outbox<S>(mut sink: S, mut inbox: mpsc::Receiver<String>)
where
    S: Sink<Message> + Unpin,
{
    while let Some(frame) = inbox.recv().await {
        if sink.send(Message::Text(frame)).await.is_err() {
            return;
        }
    }
    let _ = sink.send(Message::Close(None)).await;
}
