use crate::integration::init_tracing;
use crate::utils::{TestClient, get_json, spawn_server};

#[tokio::test]
async fn test_health_endpoints_report_counts() {
    init_tracing();
    let addr = spawn_server().await.expect("failed to spawn server");

    let banner = get_json(addr, "/").await.expect("status failed");
    assert_eq!(banner["status"], "healthy");
    assert_eq!(banner["active_rooms"], 0);
    assert_eq!(banner["total_connections"], 0);
    assert!(banner["version"].is_string());
    assert!(banner["websocket_endpoint"].as_str().unwrap().contains("/ws/"));

    let (_alice, _) = TestClient::join(addr, "r1", "alice")
        .await
        .expect("join failed");
    let (_bob, _) = TestClient::join(addr, "r2", "bob")
        .await
        .expect("join failed");

    let health = get_json(addr, "/api/health").await.expect("health failed");
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["active_rooms"], 2);
    assert_eq!(health["total_connections"], 2);
    assert!(health["timestamp"].is_string());
}
