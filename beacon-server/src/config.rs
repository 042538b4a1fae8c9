use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Inbound silence after which a keepalive ping is sent; a second such
    /// interval closes the connection.
    pub idle_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_ADDR.parse().expect("default addr is valid"),
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    /// Reads `BEACON_ADDR` and `BEACON_IDLE_TIMEOUT_SECS`, keeping the
    /// defaults for anything missing or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = env::var("BEACON_ADDR") {
            match addr.parse() {
                Ok(addr) => config.bind_addr = addr,
                Err(_) => warn!("Ignoring invalid BEACON_ADDR: {}", addr),
            }
        }

        if let Ok(secs) = env::var("BEACON_IDLE_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => config.idle_timeout = Duration::from_secs(secs),
                _ => warn!("Ignoring invalid BEACON_IDLE_TIMEOUT_SECS: {}", secs),
            }
        }

        config
    }
}
