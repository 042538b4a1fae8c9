use crate::integration::init_tracing;
use crate::utils::{TestClient, spawn_server};

#[tokio::test]
async fn test_roster_excludes_joiner() {
    init_tracing();
    let addr = spawn_server().await.expect("failed to spawn server");

    let (mut alice, alice_joined) = TestClient::join(addr, "r1", "alice")
        .await
        .expect("alice join failed");
    let (mut bob, bob_joined) = TestClient::join(addr, "r1", "bob")
        .await
        .expect("bob join failed");

    // Bob's roster is exactly [alice]; his own record never appears in it.
    let roster = bob_joined["participants"].as_array().unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0]["name"], "alice");
    assert_eq!(roster[0]["id"], alice_joined["user_id"]);

    // Alice is told about bob; bob receives no user_joined for himself.
    let announcement = alice.expect_type("user_joined").await.expect("no user_joined");
    assert_eq!(announcement["user"]["name"], "bob");
    assert_eq!(announcement["user"]["id"], bob_joined["user_id"]);
    assert_eq!(announcement["room_id"], "r1");

    bob.assert_silent(300).await.expect("bob heard his own join");
}
