//! Configuration utilities (ports, timers, env vars).

use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use mixtape_room::DEFAULT_CLEANUP_DELAY;

fn env_port(var: &str, default: u16) -> u16 {
    env::var(var)
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(default)
}

/// Address for the HTTP API (room create/join, health).
///
/// Reads `HTTP_PORT`, defaults to 3001, binds to 0.0.0.0.
pub fn http_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, env_port("HTTP_PORT", 3001)))
}

/// Address for the websocket gateway.
///
/// Reads `WS_PORT`, defaults to 3002, binds to 0.0.0.0.
pub fn ws_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, env_port("WS_PORT", 3002)))
}

/// How long a non-viable room lingers before destruction.
///
/// Reads `CLEANUP_DELAY_SECS`, defaults to 30 seconds.
pub fn cleanup_delay() -> Duration {
    env::var("CLEANUP_DELAY_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_CLEANUP_DELAY)
}
