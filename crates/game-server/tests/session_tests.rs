//! WebSocket session integration tests.
//!
//! Every test drives a real server over real sockets. The creator connects
//! and reads their first state before the opponent connects, so seat
//! assignment is deterministic.

use gs_test_utils::{TestGameServer, TestPlayer};
use serde_json::{json, Value};
use std::time::Duration;

const SILENCE: Duration = Duration::from_millis(200);

/// Create, join and connect both players. Returns them after both have
/// seen the two-player state.
async fn seated_pair(
    server: &TestGameServer,
) -> Result<(String, TestPlayer, TestPlayer), anyhow::Error> {
    let game_id = server.create_game("Alice").await?;
    server.join_game("Bob", &game_id).await?;

    let mut alice = TestPlayer::connect(server, &game_id).await?;
    let first = alice.next_json().await?;
    assert_eq!(first["player1"], "X");
    assert!(first.get("player2").is_none());

    let mut bob = TestPlayer::connect(server, &game_id).await?;
    let for_alice = alice.next_json().await?;
    let for_bob = bob.next_json().await?;
    assert_eq!(for_alice, for_bob);
    assert_eq!(for_bob["player2"], "O");

    Ok((game_id, alice, bob))
}

/// Alternate moves starting with X, reading the mirrored state after each.
async fn play(
    alice: &mut TestPlayer,
    bob: &mut TestPlayer,
    cells: &[i64],
) -> Result<Value, anyhow::Error> {
    let mut last = Value::Null;
    for (i, &cell) in cells.iter().enumerate() {
        if i % 2 == 0 {
            alice.send_move(cell).await?;
        } else {
            bob.send_move(cell).await?;
        }
        let a = alice.next_json().await?;
        let b = bob.next_json().await?;
        assert_eq!(a, b, "both players see the same state after cell {cell}");
        last = a;
    }
    Ok(last)
}

/// Poll until the server holds `expected` games.
async fn wait_for_games(server: &TestGameServer, expected: usize) -> Result<(), anyhow::Error> {
    for _ in 0..50 {
        if server.coordinator().active_games().await == expected {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    Err(anyhow::anyhow!("server never reached {expected} games"))
}

#[tokio::test]
async fn test_connect_assigns_roles_and_broadcasts() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;
    let (_game_id, mut alice, mut bob) = seated_pair(&server).await?;

    alice.expect_silence(SILENCE).await?;
    bob.expect_silence(SILENCE).await?;

    Ok(())
}

#[tokio::test]
async fn test_moves_are_mirrored_to_both_players() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;
    let (_game_id, mut alice, mut bob) = seated_pair(&server).await?;

    let state = play(&mut alice, &mut bob, &[4]).await?;

    assert_eq!(state["board"], json!(["", "", "", "", "X", "", "", "", ""]));
    assert_eq!(state["turn"], "O");

    Ok(())
}

/// Out-of-turn, occupied and out-of-range moves produce no broadcast.
#[tokio::test]
async fn test_illegal_moves_are_ignored() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;
    let (game_id, mut alice, mut bob) = seated_pair(&server).await?;

    bob.send_move(0).await?;
    alice.expect_silence(SILENCE).await?;
    bob.expect_silence(SILENCE).await?;

    play(&mut alice, &mut bob, &[0]).await?;

    bob.send_move(0).await?;
    bob.send_move(9).await?;
    bob.send_move(-1).await?;
    bob.send_json(&json!({ "type": "move" })).await?;
    alice.expect_silence(SILENCE).await?;
    bob.expect_silence(SILENCE).await?;

    let game = server
        .coordinator()
        .snapshot(&game_id.as_str().into())
        .await
        .ok_or_else(|| anyhow::anyhow!("game vanished"))?;
    assert_eq!(game.turn().map(|r| r.to_string()), Some("O".to_string()));

    Ok(())
}

#[tokio::test]
async fn test_malformed_frames_are_ignored() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;
    let (_game_id, mut alice, mut bob) = seated_pair(&server).await?;

    alice.send_text("not json").await?;
    alice.send_json(&json!({ "type": "teleport" })).await?;
    alice.send_json(&json!({ "cell": 3 })).await?;
    alice.expect_silence(SILENCE).await?;
    bob.expect_silence(SILENCE).await?;

    // The session is still live
    let state = play(&mut alice, &mut bob, &[2]).await?;
    assert_eq!(state["board"][2], "X");

    Ok(())
}

#[tokio::test]
async fn test_win_then_reset() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;
    let (_game_id, mut alice, mut bob) = seated_pair(&server).await?;

    let state = play(&mut alice, &mut bob, &[0, 3, 1, 4, 2]).await?;
    assert_eq!(state["winner"], "X");
    assert_eq!(state["is_draw"], false);
    assert!(state.get("turn").is_none());

    // Finished games accept no further moves
    bob.send_move(5).await?;
    alice.expect_silence(SILENCE).await?;

    bob.send_reset().await?;
    let a = alice.next_json().await?;
    let b = bob.next_json().await?;
    assert_eq!(a, b);
    assert_eq!(a["board"], json!(["", "", "", "", "", "", "", "", ""]));
    assert_eq!(a["turn"], "X");
    assert!(a.get("winner").is_none());
    assert_eq!(a["player1_name"], "Alice");
    assert_eq!(a["player2_name"], "Bob");
    assert_eq!(a["player2"], "O");

    Ok(())
}

#[tokio::test]
async fn test_draw() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;
    let (_game_id, mut alice, mut bob) = seated_pair(&server).await?;

    let state = play(&mut alice, &mut bob, &[0, 1, 2, 4, 3, 5, 7, 6, 8]).await?;

    assert_eq!(state["is_draw"], true);
    assert!(state.get("winner").is_none());
    assert!(state.get("turn").is_none());

    Ok(())
}

/// The creator leaving ends the game for everyone.
#[tokio::test]
async fn test_creator_leave_redirects_and_deletes() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;
    let (game_id, mut alice, mut bob) = seated_pair(&server).await?;

    alice.send_leave().await?;

    let redirect = json!({ "type": "redirect", "url": "/" });
    assert_eq!(bob.next_json().await?, redirect);
    assert_eq!(alice.next_json().await?, redirect);
    bob.expect_closed().await?;
    alice.expect_closed().await?;

    wait_for_games(&server, 0).await?;

    let mut late = TestPlayer::connect(&server, &game_id).await?;
    late.expect_closed().await?;

    let response = server
        .post_join(json!({ "name": "Carol", "gameId": game_id }))
        .await?;
    assert_eq!(response.status(), 404);

    Ok(())
}

#[tokio::test]
async fn test_creator_disconnect_redirects_opponent() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;
    let (_game_id, alice, mut bob) = seated_pair(&server).await?;

    alice.close().await?;

    assert_eq!(
        bob.next_json().await?,
        json!({ "type": "redirect", "url": "/" })
    );
    bob.expect_closed().await?;
    wait_for_games(&server, 0).await?;

    Ok(())
}

/// The opponent leaving restarts the round and frees the second seat.
#[tokio::test]
async fn test_opponent_disconnect_resets_for_creator() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;
    let (game_id, mut alice, mut bob) = seated_pair(&server).await?;

    play(&mut alice, &mut bob, &[0, 4]).await?;
    bob.close().await?;

    let state = alice.next_json().await?;
    assert_eq!(state["board"], json!(["", "", "", "", "", "", "", "", ""]));
    assert_eq!(state["turn"], "X");
    assert_eq!(state["player1_name"], "Alice");
    assert!(state.get("player2").is_none());
    assert!(state.get("player2_name").is_none());

    // The seat can be taken again
    server.join_game("Carol", &game_id).await?;
    let mut carol = TestPlayer::connect(&server, &game_id).await?;
    let for_alice = alice.next_json().await?;
    let for_carol = carol.next_json().await?;
    assert_eq!(for_alice, for_carol);
    assert_eq!(for_carol["player2_name"], "Carol");
    assert_eq!(for_carol["player2"], "O");

    Ok(())
}

#[tokio::test]
async fn test_opponent_leave_closes_only_opponent() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;
    let (game_id, mut alice, mut bob) = seated_pair(&server).await?;

    bob.send_leave().await?;

    bob.expect_closed().await?;
    let state = alice.next_json().await?;
    assert!(state.get("player2").is_none());
    assert_eq!(server.coordinator().active_games().await, 1);
    assert_eq!(
        server
            .coordinator()
            .connection_count(&game_id.as_str().into())
            .await,
        1
    );

    Ok(())
}

#[tokio::test]
async fn test_third_connection_is_closed() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;
    let (game_id, mut alice, mut bob) = seated_pair(&server).await?;

    let mut third = TestPlayer::connect(&server, &game_id).await?;
    third.expect_closed().await?;

    alice.expect_silence(SILENCE).await?;
    bob.expect_silence(SILENCE).await?;

    Ok(())
}

#[tokio::test]
async fn test_unknown_game_connection_is_closed() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;

    let mut player = TestPlayer::connect(&server, "0123456789abcdef").await?;
    player.expect_closed().await?;

    assert_eq!(server.coordinator().active_games().await, 0);

    Ok(())
}

/// The last participant disconnecting deletes the game.
#[tokio::test]
async fn test_sole_participant_disconnect_deletes_game() -> Result<(), anyhow::Error> {
    let server = TestGameServer::spawn().await?;
    let game_id = server.create_game("Alice").await?;

    let mut alice = TestPlayer::connect(&server, &game_id).await?;
    alice.next_json().await?;
    alice.close().await?;

    wait_for_games(&server, 0).await?;

    Ok(())
}
