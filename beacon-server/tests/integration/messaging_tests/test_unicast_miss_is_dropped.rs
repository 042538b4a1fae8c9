use serde_json::json;
use uuid::Uuid;

use crate::integration::init_tracing;
use crate::utils::{TestClient, spawn_server};

#[tokio::test]
async fn test_unicast_miss_is_dropped() {
    init_tracing();
    let addr = spawn_server().await.expect("failed to spawn server");

    let (mut alice, _) = TestClient::join(addr, "r1", "alice")
        .await
        .expect("alice join failed");
    let (mut bob, _) = TestClient::join(addr, "r1", "bob")
        .await
        .expect("bob join failed");
    alice.expect_type("user_joined").await.expect("no user_joined");

    alice
        .send_json(&json!({
            "type": "offer",
            "sdp": "v=0",
            "target": Uuid::new_v4().to_string(),
        }))
        .await
        .expect("send failed");

    // Nobody hears about it: not the room, and not the sender either.
    bob.assert_silent(300).await.expect("miss was delivered");
    alice
        .assert_silent(300)
        .await
        .expect("sender was notified of the miss");

    // Same for a target that is not even a string: still a unicast miss,
    // never a room-wide broadcast.
    alice
        .send_json(&json!({"type": "offer", "sdp": "v=0", "target": 123}))
        .await
        .expect("send failed");

    bob.assert_silent(300).await.expect("malformed target was broadcast");
    alice
        .assert_silent(300)
        .await
        .expect("sender was notified of the miss");
}
