use serde_json::json;

use crate::integration::init_tracing;
use crate::utils::{TestClient, spawn_server};

#[tokio::test]
async fn test_ping_pong() {
    init_tracing();
    let addr = spawn_server().await.expect("failed to spawn server");

    let (mut alice, _) = TestClient::join(addr, "r1", "alice")
        .await
        .expect("join failed");
    let (mut bob, _) = TestClient::join(addr, "r1", "bob")
        .await
        .expect("join failed");
    alice.expect_type("user_joined").await.expect("no user_joined");

    alice
        .send_json(&json!({"type": "ping"}))
        .await
        .expect("send failed");

    let pong = alice.expect_type("pong").await.expect("no pong");
    assert!(pong["timestamp"].is_string());

    // The reply goes to the sender only.
    bob.assert_silent(300).await.expect("pong leaked to the room");
}
