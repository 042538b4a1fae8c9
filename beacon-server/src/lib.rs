pub mod config;
pub mod error;
pub mod http;
pub mod room;
pub mod signaling;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerConfig;
use crate::signaling::SignalingService;

/// Shared state handed to every handler.
pub struct AppState {
    pub signaling: SignalingService,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            signaling: SignalingService::new(),
            config,
        }
    }
}

/// Builds the full application: status views, the WebSocket endpoint, and a
/// permissive CORS layer (browser clients connect from arbitrary origins).
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(http::server_status))
        .route("/api/health", get(http::health_check))
        .route("/api/rooms", get(http::list_rooms))
        .route("/api/rooms/{room_id}", get(http::room_info))
        .route("/ws/{room_id}", get(signaling::ws_handler))
        .layer(cors)
        .with_state(state)
}
