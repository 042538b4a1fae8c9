use std::str::FromStr;

use beacon_core::{Participant, ParticipantId, ServerMessage, SignalKind};
use chrono::Utc;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::error::RouteError;
use crate::room::ConnId;
use crate::signaling::service::SignalingService;

/// Classifies one inbound text frame by its `type` field and dispatches it.
///
/// Signaling payloads (`offer`/`answer`/`ice-candidate`) pass through as the
/// client sent them, augmented with sender metadata; `media-state` and `chat`
/// are rebuilt as server messages; `ping` is answered directly. Unknown types
/// are logged and dropped, as are messages from connections that never
/// completed a join.
pub fn route_message(
    service: &SignalingService,
    conn_id: ConnId,
    text: &str,
) -> Result<(), RouteError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|_| RouteError::Malformed("Invalid JSON format".into()))?;
    let Value::Object(message) = value else {
        return Err(RouteError::Malformed("Expected a JSON object".into()));
    };
    let Some(msg_type) = message.get("type").and_then(Value::as_str).map(str::to_owned) else {
        return Err(RouteError::Malformed("Missing message type".into()));
    };

    let Some((room_id, sender_info)) = service.binding_of(conn_id) else {
        debug!("Dropping '{}' from a connection with no participant", msg_type);
        return Ok(());
    };

    if let Some(kind) = SignalKind::from_type(&msg_type) {
        return forward_signal(service, conn_id, &room_id, &sender_info, kind, message);
    }

    match msg_type.as_str() {
        "media-state" => {
            let update = ServerMessage::MediaState {
                user: sender_info.clone(),
                audio_enabled: flag(&message, "audio_enabled"),
                video_enabled: flag(&message, "video_enabled"),
                timestamp: Utc::now(),
            };
            debug!("Media state updated for '{}'", sender_info.name);
            service.broadcast(&room_id, &update, Some(conn_id));
            Ok(())
        }
        "chat" => {
            let chat = ServerMessage::Chat {
                user: sender_info.clone(),
                message: message
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                timestamp: Utc::now(),
            };
            debug!("Chat message from '{}'", sender_info.name);
            // Chat is the one broadcast that echoes back to the sender.
            service.broadcast(&room_id, &chat, None);
            Ok(())
        }
        "ping" => service.send_to(
            conn_id,
            &ServerMessage::Pong {
                timestamp: Utc::now(),
            },
        ),
        other => {
            warn!("Unknown message type: {}", other);
            Ok(())
        }
    }
}

/// Forwards a signaling payload, unicast when it names a `target` participant
/// and room-wide (sender excluded) otherwise. A target id that matches no
/// current member is a best-effort miss: logged, dropped, sender not told.
fn forward_signal(
    service: &SignalingService,
    conn_id: ConnId,
    room_id: &str,
    sender_info: &Participant,
    kind: SignalKind,
    mut message: Map<String, Value>,
) -> Result<(), RouteError> {
    let target = message.get("target").cloned();

    message.insert("sender".into(), json!(sender_info.id));
    message.insert("sender_name".into(), json!(sender_info.name));
    message.insert("timestamp".into(), json!(Utc::now()));

    let json = Value::Object(message).to_string();

    match target {
        // Any present target means a unicast attempt; one that is not a
        // string, not a uuid, or not a member resolves to a logged miss,
        // never a room-wide broadcast.
        Some(target_value) => {
            let resolved = target_value
                .as_str()
                .and_then(|id| ParticipantId::from_str(id).ok())
                .and_then(|id| service.find_in_room(room_id, id));
            match resolved {
                Some(target_conn) => {
                    debug!("Forwarded {} to {}", kind.as_str(), target_value);
                    if service.unicast_json(target_conn, json).is_err() {
                        warn!("Target {} unreachable; treating as disconnect", target_value);
                        service.leave(target_conn);
                    }
                }
                None => {
                    warn!("Target user {} not found in room '{}'", target_value, room_id);
                }
            }
        }
        None => {
            debug!("Broadcast {} to room '{}'", kind.as_str(), room_id);
            service.broadcast_json(room_id, json, Some(conn_id));
        }
    }

    Ok(())
}

fn flag(message: &Map<String, Value>, key: &str) -> bool {
    message.get(key).and_then(Value::as_bool).unwrap_or(true)
}
