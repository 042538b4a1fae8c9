use thiserror::Error;

/// Outcome of handling one inbound frame. The read loop treats the two
/// variants differently: malformed input gets an `error` reply and the
/// connection stays open; a closed transport ends the loop.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("{0}")]
    Malformed(String),
    #[error("connection closed")]
    ConnectionClosed,
}
