//! WebSocket participant client for E2E tests.

use crate::server_harness::TestGameServer;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// How long `next_json` waits before failing the test.
pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// One connected participant.
pub struct TestPlayer {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestPlayer {
    /// Open the game's WebSocket. Succeeds even if the server is about to
    /// reject the connection; use `expect_closed` to observe a rejection.
    pub async fn connect(server: &TestGameServer, game_id: &str) -> Result<Self, anyhow::Error> {
        let (socket, _response) = connect_async(server.ws_url(game_id))
            .await
            .map_err(|e| anyhow::anyhow!("WebSocket connect failed: {}", e))?;
        Ok(Self { socket })
    }

    /// Send a raw text frame.
    pub async fn send_text(&mut self, text: &str) -> Result<(), anyhow::Error> {
        self.socket.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    pub async fn send_json(&mut self, value: &Value) -> Result<(), anyhow::Error> {
        self.send_text(&value.to_string()).await
    }

    /// Send `{"type":"move","cell":cell}`.
    pub async fn send_move(&mut self, cell: i64) -> Result<(), anyhow::Error> {
        self.send_json(&json!({ "type": "move", "cell": cell })).await
    }

    pub async fn send_reset(&mut self) -> Result<(), anyhow::Error> {
        self.send_json(&json!({ "type": "reset" })).await
    }

    pub async fn send_leave(&mut self) -> Result<(), anyhow::Error> {
        self.send_json(&json!({ "type": "leave_game" })).await
    }

    /// Next text frame decoded as JSON.
    ///
    /// Fails if the socket closes or nothing arrives within
    /// [`DEFAULT_RECV_TIMEOUT`].
    pub async fn next_json(&mut self) -> Result<Value, anyhow::Error> {
        match self.next_frame(DEFAULT_RECV_TIMEOUT).await? {
            Some(Message::Text(text)) => Ok(serde_json::from_str(&text)?),
            Some(other) => Err(anyhow::anyhow!("expected text frame, got {:?}", other)),
            None => Err(anyhow::anyhow!("timed out waiting for a frame")),
        }
    }

    /// Succeeds if no text frame arrives within `window`.
    pub async fn expect_silence(&mut self, window: Duration) -> Result<(), anyhow::Error> {
        match self.next_frame(window).await? {
            None => Ok(()),
            Some(frame) => Err(anyhow::anyhow!("expected silence, got {:?}", frame)),
        }
    }

    /// Succeeds once the server closes the socket. Text frames before the
    /// close are an error.
    pub async fn expect_closed(&mut self) -> Result<(), anyhow::Error> {
        match self.next_frame(DEFAULT_RECV_TIMEOUT).await {
            Ok(Some(Message::Close(_))) => Ok(()),
            // Connection dropped without a close handshake also counts
            Err(_) => Ok(()),
            Ok(Some(other)) => Err(anyhow::anyhow!("expected close, got {:?}", other)),
            Ok(None) => Err(anyhow::anyhow!("timed out waiting for close")),
        }
    }

    /// Close the socket from the client side.
    pub async fn close(mut self) -> Result<(), anyhow::Error> {
        self.socket.close(None).await?;
        Ok(())
    }

    /// Next text or close frame, skipping pings and pongs. `Ok(None)` on
    /// timeout; an error if the stream ended or failed.
    async fn next_frame(&mut self, wait: Duration) -> Result<Option<Message>, anyhow::Error> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let next = match tokio::time::timeout_at(deadline, self.socket.next()).await {
                Ok(next) => next,
                Err(_) => return Ok(None),
            };
            match next {
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                Some(Ok(frame)) => return Ok(Some(frame)),
                Some(Err(e)) => return Err(anyhow::anyhow!("WebSocket error: {}", e)),
                None => return Err(anyhow::anyhow!("WebSocket stream ended")),
            }
        }
    }
}
