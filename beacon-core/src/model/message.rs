use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::participant::{Participant, ParticipantId};

/// Every message the relay itself produces, tagged by `type` on the wire.
///
/// Forwarded signaling payloads (`offer`, `answer`, `ice-candidate`) are not
/// listed here: their fields belong to the clients and pass through as raw
/// JSON objects, augmented with sender metadata by the router. [`SignalKind`]
/// classifies those.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "room_joined")]
    RoomJoined {
        room_id: String,
        user_id: ParticipantId,
        participants: Vec<Participant>,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "user_joined")]
    UserJoined { user: Participant, room_id: String },
    #[serde(rename = "user_left")]
    UserLeft { user: Participant },
    #[serde(rename = "media-state")]
    MediaState {
        user: Participant,
        audio_enabled: bool,
        video_enabled: bool,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "chat")]
    Chat {
        user: Participant,
        message: String,
        timestamp: DateTime<Utc>,
    },
    /// Keepalive probe sent after an idle interval with no inbound frames.
    #[serde(rename = "ping")]
    Ping,
    #[serde(rename = "pong")]
    Pong { timestamp: DateTime<Utc> },
    #[serde(rename = "error")]
    Error { message: String },
}

/// The pass-through signaling message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    pub fn from_type(msg_type: &str) -> Option<Self> {
        match msg_type {
            "offer" => Some(Self::Offer),
            "answer" => Some(Self::Answer),
            "ice-candidate" => Some(Self::IceCandidate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "ice-candidate",
        }
    }
}
