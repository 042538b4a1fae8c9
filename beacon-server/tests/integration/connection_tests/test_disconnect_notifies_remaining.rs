use crate::integration::init_tracing;
use crate::utils::{TestClient, get_json, spawn_server};

#[tokio::test]
async fn test_disconnect_notifies_remaining() {
    init_tracing();
    let addr = spawn_server().await.expect("failed to spawn server");

    let (alice, alice_joined) = TestClient::join(addr, "r1", "alice")
        .await
        .expect("alice join failed");
    let (mut bob, _) = TestClient::join(addr, "r1", "bob")
        .await
        .expect("bob join failed");

    alice.close().await.expect("close failed");

    let departure = bob.expect_type("user_left").await.expect("no user_left");
    assert_eq!(departure["user"]["id"], alice_joined["user_id"]);
    assert_eq!(departure["user"]["name"], "alice");

    // user_left arriving means the leave completed, so the snapshot is fresh.
    let detail = get_json(addr, "/api/rooms/r1").await.expect("room detail failed");
    assert_eq!(detail["exists"], true);
    assert_eq!(detail["participant_count"], 1);
}
