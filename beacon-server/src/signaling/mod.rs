mod router;
mod service;
mod ws_handler;

pub use router::*;
pub use service::*;
pub use ws_handler::*;
