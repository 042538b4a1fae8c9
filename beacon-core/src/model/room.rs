use serde::{Deserialize, Serialize};

use crate::model::participant::Participant;

/// Point-in-time view of one room, as returned by the room listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummary {
    pub room_id: String,
    pub participant_count: usize,
    pub participants: Vec<Participant>,
}

/// Detail view for a single room id, whether or not the room exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetail {
    pub room_id: String,
    pub exists: bool,
    pub participant_count: usize,
    pub participants: Vec<Participant>,
}
