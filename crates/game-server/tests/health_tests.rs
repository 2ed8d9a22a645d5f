//! Health and metrics endpoint integration tests.

use gs_test_utils::TestGameServer;

#[tokio::test]
async fn test_health_endpoint_returns_200() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;

    let response = reqwest::get(format!("{}/health", server.url())).await?;

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["active_games"], 0);

    Ok(())
}

#[tokio::test]
async fn test_health_counts_games() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;
    server.create_game("Alice").await?;
    server.create_game("Bob").await?;

    let body: serde_json::Value = reqwest::get(format!("{}/health", server.url()))
        .await?
        .json()
        .await?;

    assert_eq!(body["active_games"], 2);

    Ok(())
}

#[tokio::test]
async fn test_metrics_endpoint_returns_200() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;

    let response = reqwest::get(format!("{}/metrics", server.url())).await?;

    assert_eq!(response.status(), 200);

    Ok(())
}

#[tokio::test]
async fn test_unknown_route_returns_404() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;

    let response = reqwest::get(format!("{}/nonexistent", server.url())).await?;

    assert_eq!(response.status(), 404);

    Ok(())
}
