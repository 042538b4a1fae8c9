use std::time::Duration;

use crate::integration::init_tracing;
use crate::utils::{TestClient, get_json, spawn_server_with};

#[tokio::test]
async fn test_liveness_timeout_closes_connection() {
    init_tracing();
    let addr = spawn_server_with(Duration::from_millis(200))
        .await
        .expect("failed to spawn server");

    let (mut alice, _) = TestClient::join(addr, "quiet", "alice")
        .await
        .expect("join failed");

    // First silent interval: the server probes with an application-level ping.
    let probe = alice.expect_type("ping").await.expect("no keepalive probe");
    assert_eq!(probe, serde_json::json!({"type": "ping"}));

    // Stay silent through the second interval: the server gives up.
    alice
        .wait_for_close(2_000)
        .await
        .expect("server never closed the idle connection");

    // The liveness path runs the same cleanup as an explicit disconnect.
    let mut attempts = 0;
    loop {
        let health = get_json(addr, "/api/health").await.expect("health failed");
        if health["active_rooms"] == 0 && health["total_connections"] == 0 {
            break;
        }
        attempts += 1;
        assert!(attempts < 50, "room survived the liveness timeout: {health}");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::test]
async fn test_inbound_activity_rearms_liveness() {
    init_tracing();
    let addr = spawn_server_with(Duration::from_millis(300))
        .await
        .expect("failed to spawn server");

    let (mut alice, _) = TestClient::join(addr, "busy", "alice")
        .await
        .expect("join failed");

    // Keep answering each probe; the connection must stay up well past
    // several idle intervals.
    for _ in 0..4 {
        alice.expect_type("ping").await.expect("no keepalive probe");
        alice
            .send_json(&serde_json::json!({"type": "ping"}))
            .await
            .expect("send failed");
        alice.expect_type("pong").await.expect("no pong");
    }

    let health = get_json(addr, "/api/health").await.expect("health failed");
    assert_eq!(health["total_connections"], 1);
}
