//! Shared networking and protocol constants used by provider and renderer.
use std::time::Duration;

/// UDP port the provider listens on for renderer messages.
pub const PROVIDER_PORT: u16 = 8081;

/// Maximum number of display slots, and therefore tracked items per batch.
pub const MAX_SLOTS: usize = 20;

/// Delay between consecutive per-item sends of a dispatched batch.
pub const SEND_STAGGER: Duration = Duration::from_millis(50);

/// Per-index delay step between `request-refresh` messages.
pub const REFRESH_STAGGER: Duration = Duration::from_millis(50);

/// Interval of the periodic full refresh on the provider.
pub const FULL_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Interval between renderer keep-alive pings.
pub const PING_INTERVAL: Duration = Duration::from_millis(2000);

/// A renderer that has not been heard from for this long is considered gone.
pub const PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// Size of the datagram receive buffer.
pub const MAX_DATAGRAM: usize = 4096;

/// Helper to format an IPv4 address with a port like "ip:port".
pub fn addr(ip: &str, port: u16) -> String {
    format!("{}:{}", ip, port)
}
