use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::Message;
use beacon_core::Participant;
use tokio::sync::mpsc;

static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one live connection. Distinct from the participant id: two
/// connections carrying identical participant data are still two connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnId(u64);

impl ConnId {
    pub fn next() -> Self {
        Self(NEXT_CONN_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// What the registry holds for one joined connection: the identity bound at
/// join time plus the handle to its writer task.
#[derive(Debug, Clone)]
pub struct Member {
    pub participant: Participant,
    pub sender: mpsc::UnboundedSender<Message>,
}
