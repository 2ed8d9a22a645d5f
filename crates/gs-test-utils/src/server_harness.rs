//! Test server harness for E2E testing
//!
//! Provides `TestGameServer` for spawning real game server instances in tests.

use game_server::config::Config;
use game_server::lifecycle::LifecycleCoordinator;
use game_server::routes::{self, AppState};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the game server in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_health() -> Result<(), anyhow::Error> {
///     let server = TestGameServer::spawn().await?;
///
///     let response = reqwest::get(format!("{}/health", server.url())).await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestGameServer {
    addr: SocketAddr,
    config: Config,
    coordinator: Arc<LifecycleCoordinator>,
    client: reqwest::Client,
    _handle: JoinHandle<()>,
}

impl TestGameServer {
    /// Spawn a server with default test configuration.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Start the HTTP server in the background
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_vars(HashMap::new()).await
    }

    /// Spawn a server with extra configuration variables layered over the
    /// test defaults.
    pub async fn spawn_with_vars(
        overrides: HashMap<String, String>,
    ) -> Result<Self, anyhow::Error> {
        let mut vars = HashMap::from([
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("OUTBOX_CAPACITY".to_string(), "16".to_string()),
        ]);
        vars.extend(overrides);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let coordinator = Arc::new(LifecycleCoordinator::new(&config));
        let state = Arc::new(AppState {
            coordinator: coordinator.clone(),
            config: config.clone(),
        });

        // Not installed globally, so many servers can coexist in one process
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

        // Build routes using game-server's real route builder
        let app = routes::build_routes(state, metrics_handle);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind(&config.bind_address)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        // Spawn server in background
        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            coordinator,
            client: reqwest::Client::new(),
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// WebSocket URL for a game.
    pub fn ws_url(&self, game_id: &str) -> String {
        format!("ws://{}/ws/{}", self.addr, game_id)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Direct access to the server's coordinator for state assertions.
    pub fn coordinator(&self) -> &Arc<LifecycleCoordinator> {
        &self.coordinator
    }

    /// POST /create with the given body.
    pub async fn post_create(
        &self,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, anyhow::Error> {
        Ok(self
            .client
            .post(format!("{}/create", self.url()))
            .json(&body)
            .send()
            .await?)
    }

    /// POST /join with the given body.
    pub async fn post_join(
        &self,
        body: serde_json::Value,
    ) -> Result<reqwest::Response, anyhow::Error> {
        Ok(self
            .client
            .post(format!("{}/join", self.url()))
            .json(&body)
            .send()
            .await?)
    }

    /// Create a game and return its ID.
    pub async fn create_game(&self, name: &str) -> Result<String, anyhow::Error> {
        let response = self.post_create(json!({ "name": name })).await?;
        anyhow::ensure!(
            response.status().is_success(),
            "create failed with status {}",
            response.status()
        );
        game_id_from(response).await
    }

    /// Join a game and return its ID.
    pub async fn join_game(&self, name: &str, game_id: &str) -> Result<String, anyhow::Error> {
        let response = self
            .post_join(json!({ "name": name, "gameId": game_id }))
            .await?;
        anyhow::ensure!(
            response.status().is_success(),
            "join failed with status {}",
            response.status()
        );
        game_id_from(response).await
    }
}

async fn game_id_from(response: reqwest::Response) -> Result<String, anyhow::Error> {
    let body: serde_json::Value = response.json().await?;
    body["gameId"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("response has no gameId: {}", body))
}

impl Drop for TestGameServer {
    fn drop(&mut self) {
        // Abort the server task so the port is released when the test ends
        self._handle.abort();
    }
}
