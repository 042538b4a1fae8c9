use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use beacon_core::{Participant, ServerMessage};
use futures::stream::SplitStream;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::AppState;
use crate::error::RouteError;
use crate::room::ConnId;
use crate::signaling::router::route_message;
use crate::signaling::service::SignalingService;

pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    name: Option<String>,
}

/// `GET /ws/{room_id}?name=...` — one long-lived connection per participant.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    Query(query): Query<WsQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let name = query
        .name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());

    ws.on_upgrade(move |socket| handle_socket(socket, room_id, name, state))
}

async fn handle_socket(socket: WebSocket, room_id: String, name: String, state: Arc<AppState>) {
    let participant = Participant::new(name);
    let display_name = participant.name.clone();
    let conn_id = ConnId::next();

    info!(
        "WebSocket connection: '{}' -> room '{}' ({})",
        display_name, room_id, conn_id
    );

    let (mut sink, stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                break;
            }
        }
    });

    // The upgrade has completed by the time this future runs; a join failure
    // here means the socket died immediately, and nothing stays registered.
    let service = state.signaling.clone();
    if service.join(conn_id, &room_id, participant, tx).is_err() {
        send_task.abort();
        return;
    }

    let mut recv_task = tokio::spawn({
        let service = service.clone();
        let idle = state.config.idle_timeout;
        async move {
            read_loop(stream, &service, conn_id, idle).await;
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // Single funnel for every exit path; leave itself is also idempotent.
    service.leave(conn_id);
    info!("WebSocket disconnected: '{}' ({})", display_name, conn_id);
}

/// The connection's only suspension point: wait for the next inbound frame or
/// the idle timeout, whichever comes first.
///
/// Liveness runs ACTIVE -> PING_SENT on the first silent interval and closes
/// the connection on the second; any inbound frame re-arms it.
async fn read_loop(
    mut stream: SplitStream<WebSocket>,
    service: &SignalingService,
    conn_id: ConnId,
    idle: Duration,
) {
    let mut ping_sent = false;

    loop {
        match tokio::time::timeout(idle, stream.next()).await {
            Ok(Some(Ok(frame))) => {
                ping_sent = false;
                match frame {
                    Message::Text(text) => {
                        match route_message(service, conn_id, text.as_str()) {
                            Ok(()) => {}
                            Err(RouteError::Malformed(reason)) => {
                                warn!("Rejected frame from {}: {}", conn_id, reason);
                                let reply = ServerMessage::Error { message: reason };
                                if service.send_to(conn_id, &reply).is_err() {
                                    break;
                                }
                            }
                            Err(RouteError::ConnectionClosed) => break,
                        }
                    }
                    Message::Close(_) => break,
                    // Control and binary frames count only as liveness.
                    _ => {}
                }
            }
            Ok(Some(Err(_))) | Ok(None) => break,
            Err(_) => {
                if ping_sent {
                    debug!("No activity after keepalive on {}; closing", conn_id);
                    break;
                }
                ping_sent = true;
                if service.send_to(conn_id, &ServerMessage::Ping).is_err() {
                    break;
                }
            }
        }
    }
}
