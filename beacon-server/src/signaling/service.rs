use std::sync::Arc;

use axum::extract::ws::{Message, Utf8Bytes};
use beacon_core::{Participant, ParticipantId, RoomDetail, RoomSummary, ServerMessage};
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::RouteError;
use crate::room::{ConnId, Member, RoomRegistry};

struct ServiceInner {
    registry: RoomRegistry,
}

/// Membership manager and broadcast primitive. Cheap to clone; all clones
/// share one registry. The HTTP status endpoints only use the read-only
/// methods at the bottom.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<ServiceInner>,
}

impl Default for SignalingService {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalingService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                registry: RoomRegistry::new(),
            }),
        }
    }

    /// Registers an accepted connection in `room_id` and announces it.
    ///
    /// The roster snapshot is taken before the insert, in the same critical
    /// section, so the new member never sees itself in its own roster. A
    /// failure to deliver `room_joined` means the connection is already gone
    /// and is unwound through the regular leave path; a failure to notify the
    /// *others* never undoes the join.
    pub fn join(
        &self,
        conn_id: ConnId,
        room_id: &str,
        participant: Participant,
        sender: mpsc::UnboundedSender<Message>,
    ) -> Result<(), RouteError> {
        let member = Member {
            participant: participant.clone(),
            sender,
        };
        let roster = self.inner.registry.insert(room_id, conn_id, member);

        let joined = ServerMessage::RoomJoined {
            room_id: room_id.to_string(),
            user_id: participant.id,
            participants: roster.clone(),
            timestamp: Utc::now(),
        };
        if self.send_to(conn_id, &joined).is_err() {
            warn!(
                "Could not deliver room_joined to '{}'; dropping the connection",
                participant.name
            );
            self.leave(conn_id);
            return Err(RouteError::ConnectionClosed);
        }

        info!(
            "User '{}' joined room '{}' ({} already present)",
            participant.name,
            room_id,
            roster.len()
        );

        if !roster.is_empty() {
            let announcement = ServerMessage::UserJoined {
                user: participant,
                room_id: room_id.to_string(),
            };
            self.broadcast(room_id, &announcement, Some(conn_id));
        }

        Ok(())
    }

    /// Removes the connection and announces its departure to whoever is left.
    /// Idempotent: the explicit-close and liveness paths may both land here.
    pub fn leave(&self, conn_id: ConnId) {
        let Some((room_id, participant)) = self.inner.registry.remove(conn_id) else {
            return;
        };

        info!("User '{}' left room '{}'", participant.name, room_id);

        let departure = ServerMessage::UserLeft { user: participant };
        self.broadcast(&room_id, &departure, None);
    }

    /// Serializes once, snapshots the recipients under the registry lock, and
    /// delivers outside it. A member whose channel is closed is already
    /// disconnected: it goes through [`Self::leave`] immediately rather than
    /// waiting for its liveness cycle.
    pub fn broadcast(&self, room_id: &str, message: &ServerMessage, exclude: Option<ConnId>) {
        match serde_json::to_string(message) {
            Ok(json) => self.broadcast_json(room_id, json, exclude),
            Err(e) => error!("Failed to serialize broadcast message: {}", e),
        }
    }

    pub(crate) fn broadcast_json(&self, room_id: &str, json: String, exclude: Option<ConnId>) {
        let recipients = self.inner.registry.recipients(room_id, exclude);
        let frame = Utf8Bytes::from(json);

        let mut dropped = Vec::new();
        let mut sent = 0usize;
        for (conn_id, sender) in recipients {
            if sender.send(Message::Text(frame.clone())).is_ok() {
                sent += 1;
            } else {
                dropped.push(conn_id);
            }
        }

        debug!("Delivered to {} members of room '{}'", sent, room_id);

        for conn_id in dropped {
            warn!("Send to {} failed during broadcast; treating as disconnect", conn_id);
            self.leave(conn_id);
        }
    }

    /// Delivers one server-built message to one connection.
    pub fn send_to(&self, conn_id: ConnId, message: &ServerMessage) -> Result<(), RouteError> {
        let json = serde_json::to_string(message)
            .map_err(|e| RouteError::Malformed(e.to_string()))?;
        self.unicast_json(conn_id, json)
    }

    pub(crate) fn unicast_json(&self, conn_id: ConnId, json: String) -> Result<(), RouteError> {
        let sender = self
            .inner
            .registry
            .sender_of(conn_id)
            .ok_or(RouteError::ConnectionClosed)?;
        sender
            .send(Message::Text(json.into()))
            .map_err(|_| RouteError::ConnectionClosed)
    }

    pub(crate) fn binding_of(&self, conn_id: ConnId) -> Option<(String, Participant)> {
        self.inner.registry.binding_of(conn_id)
    }

    pub(crate) fn find_in_room(&self, room_id: &str, target: ParticipantId) -> Option<ConnId> {
        self.inner.registry.find_in_room(room_id, target)
    }

    // Read-only query interface, used by the HTTP views.

    /// (active rooms, total connections)
    pub fn stats(&self) -> (usize, usize) {
        self.inner.registry.stats()
    }

    pub fn room_exists(&self, room_id: &str) -> bool {
        self.inner.registry.room_exists(room_id)
    }

    pub fn room_summaries(&self) -> Vec<RoomSummary> {
        self.inner.registry.room_summaries()
    }

    pub fn room_detail(&self, room_id: &str) -> RoomDetail {
        self.inner.registry.room_detail(room_id)
    }
}
