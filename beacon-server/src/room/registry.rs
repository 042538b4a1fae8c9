use std::collections::{HashMap, HashSet};

use axum::extract::ws::Message;
use beacon_core::{Participant, ParticipantId, RoomDetail, RoomSummary};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::info;

use crate::room::member::{ConnId, Member};

#[derive(Debug, Clone)]
struct Binding {
    room_id: String,
    member: Member,
}

#[derive(Default)]
struct Indexes {
    /// room id -> member connections
    rooms: HashMap<String, HashSet<ConnId>>,
    /// connection -> (room id, member handle)
    members: HashMap<ConnId, Binding>,
}

/// Owns room membership. Both indexes are updated in the same critical
/// section, so room creation on first join, removal of the room on last
/// leave, and roster snapshots are each atomic with respect to concurrent
/// joins and leaves on the same room id. No operation here performs I/O;
/// callers take snapshots and send outside the lock.
#[derive(Default)]
pub struct RoomRegistry {
    inner: Mutex<Indexes>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `member` under `room_id`, creating the room if this is its
    /// first member. Returns the roster as it was before the insert, so a
    /// joiner never appears in its own roster snapshot.
    pub fn insert(&self, room_id: &str, conn_id: ConnId, member: Member) -> Vec<Participant> {
        let mut guard = self.inner.lock();
        let Indexes { rooms, members } = &mut *guard;

        if !rooms.contains_key(room_id) {
            info!("Created new room: {}", room_id);
        }
        let room = rooms.entry(room_id.to_string()).or_default();

        let roster = room
            .iter()
            .filter_map(|id| members.get(id))
            .map(|binding| binding.member.participant.clone())
            .collect();

        room.insert(conn_id);
        members.insert(
            conn_id,
            Binding {
                room_id: room_id.to_string(),
                member,
            },
        );

        roster
    }

    /// Removes the connection and, if its room became empty, deletes the room
    /// entry in the same step. Idempotent: removing an untracked connection
    /// returns `None` and changes nothing.
    pub fn remove(&self, conn_id: ConnId) -> Option<(String, Participant)> {
        let mut guard = self.inner.lock();
        let binding = guard.members.remove(&conn_id)?;

        if let Some(room) = guard.rooms.get_mut(&binding.room_id) {
            room.remove(&conn_id);
            if room.is_empty() {
                guard.rooms.remove(&binding.room_id);
                info!("Removed empty room: {}", binding.room_id);
            }
        }

        Some((binding.room_id, binding.member.participant))
    }

    /// Snapshot of the senders to deliver to, taken under the lock so callers
    /// can iterate while membership keeps changing.
    pub fn recipients(
        &self,
        room_id: &str,
        exclude: Option<ConnId>,
    ) -> Vec<(ConnId, mpsc::UnboundedSender<Message>)> {
        let guard = self.inner.lock();
        let Some(room) = guard.rooms.get(room_id) else {
            return Vec::new();
        };

        room.iter()
            .filter(|id| Some(**id) != exclude)
            .filter_map(|id| {
                guard
                    .members
                    .get(id)
                    .map(|binding| (*id, binding.member.sender.clone()))
            })
            .collect()
    }

    /// The room and participant bound to a connection, if it has joined.
    pub fn binding_of(&self, conn_id: ConnId) -> Option<(String, Participant)> {
        let guard = self.inner.lock();
        let binding = guard.members.get(&conn_id)?;
        Some((binding.room_id.clone(), binding.member.participant.clone()))
    }

    pub fn sender_of(&self, conn_id: ConnId) -> Option<mpsc::UnboundedSender<Message>> {
        let guard = self.inner.lock();
        guard
            .members
            .get(&conn_id)
            .map(|binding| binding.member.sender.clone())
    }

    /// Resolves a participant id to its connection within one room.
    pub fn find_in_room(&self, room_id: &str, target: ParticipantId) -> Option<ConnId> {
        let guard = self.inner.lock();
        let room = guard.rooms.get(room_id)?;
        room.iter()
            .find(|id| {
                guard
                    .members
                    .get(id)
                    .is_some_and(|binding| binding.member.participant.id == target)
            })
            .copied()
    }

    pub fn room_exists(&self, room_id: &str) -> bool {
        self.inner.lock().rooms.contains_key(room_id)
    }

    /// (active rooms, total connections)
    pub fn stats(&self) -> (usize, usize) {
        let guard = self.inner.lock();
        (guard.rooms.len(), guard.members.len())
    }

    pub fn room_summaries(&self) -> Vec<RoomSummary> {
        let guard = self.inner.lock();
        guard
            .rooms
            .iter()
            .map(|(room_id, conns)| {
                let participants: Vec<Participant> = conns
                    .iter()
                    .filter_map(|id| guard.members.get(id))
                    .map(|binding| binding.member.participant.clone())
                    .collect();
                RoomSummary {
                    room_id: room_id.clone(),
                    participant_count: participants.len(),
                    participants,
                }
            })
            .collect()
    }

    pub fn room_detail(&self, room_id: &str) -> RoomDetail {
        let guard = self.inner.lock();
        let participants: Vec<Participant> = guard
            .rooms
            .get(room_id)
            .into_iter()
            .flatten()
            .filter_map(|id| guard.members.get(id))
            .map(|binding| binding.member.participant.clone())
            .collect();

        RoomDetail {
            room_id: room_id.to_string(),
            exists: guard.rooms.contains_key(room_id),
            participant_count: participants.len(),
            participants,
        }
    }
}
