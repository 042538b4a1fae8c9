//! Read-only snapshot views over the signaling core. None of these handlers
//! has mutation rights; they all go through the service's query interface.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use beacon_core::{RoomDetail, RoomSummary};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ServerStatus {
    pub message: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub active_rooms: usize,
    pub total_connections: usize,
    pub timestamp: DateTime<Utc>,
    pub websocket_endpoint: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub active_rooms: usize,
    pub total_connections: usize,
}

#[derive(Debug, Serialize)]
pub struct RoomListResponse {
    pub rooms: Vec<RoomSummary>,
    pub total_rooms: usize,
}

/// `GET /`
pub async fn server_status(State(state): State<Arc<AppState>>) -> Json<ServerStatus> {
    let (active_rooms, total_connections) = state.signaling.stats();
    Json(ServerStatus {
        message: "Beacon Signaling Server",
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        active_rooms,
        total_connections,
        timestamp: Utc::now(),
        websocket_endpoint: "/ws/{room_id}?name={display_name}",
    })
}

/// `GET /api/health`
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (active_rooms, total_connections) = state.signaling.stats();
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        active_rooms,
        total_connections,
    })
}

/// `GET /api/rooms`
pub async fn list_rooms(State(state): State<Arc<AppState>>) -> Json<RoomListResponse> {
    let rooms = state.signaling.room_summaries();
    let total_rooms = rooms.len();
    Json(RoomListResponse { rooms, total_rooms })
}

/// `GET /api/rooms/{room_id}` — answers for unknown rooms too, with
/// `exists: false` and an empty participant list.
pub async fn room_info(
    Path(room_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<RoomDetail> {
    Json(state.signaling.room_detail(&room_id))
}
