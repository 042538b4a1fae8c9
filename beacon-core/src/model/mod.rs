mod message;
mod participant;
mod room;

pub use message::{ServerMessage, SignalKind};
pub use participant::{Participant, ParticipantId};
pub use room::{RoomDetail, RoomSummary};
