//! Keep-alive tracker for the renderer peer.
//!
//! The provider serves a single renderer. Every datagram from the renderer (pings
//! included) refreshes its last-seen time; once nothing has arrived for longer than the
//! configured timeout the peer is expired and the provider's channel is treated as closed.
//!
//! - `PeerMonitor::touch(addr)` — record activity from `addr`, replacing any previous peer.
//! - `PeerMonitor::check_timeout()` — expire the peer if it has been silent too long and
//!   return its address.
//! - `PeerMonitor::active_peer()` — read-only view of the current peer.
//!
//! Time is measured with `std::time::Instant`, which is monotonic.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

struct PeerConnection {
    addr: SocketAddr,
    last_seen: Instant,
}

/// Tracks the renderer's last activity and decides when it is gone.
pub struct PeerMonitor {
    peer: Option<PeerConnection>,
    timeout: Duration,
}

impl PeerMonitor {
    /// Create a monitor expiring peers after `timeout` of silence.
    pub fn new(timeout: Duration) -> Self {
        Self {
            peer: None,
            timeout,
        }
    }

    /// Record activity from `addr`. Returns `true` if this is a new peer.
    pub fn touch(&mut self, addr: SocketAddr) -> bool {
        self.touch_at(addr, Instant::now())
    }

    fn touch_at(&mut self, addr: SocketAddr, now: Instant) -> bool {
        let is_new = self.peer.as_ref().map(|p| p.addr != addr).unwrap_or(true);
        self.peer = Some(PeerConnection {
            addr,
            last_seen: now,
        });
        is_new
    }

    /// Expire the peer if it exceeded the timeout; returns the expired address.
    pub fn check_timeout(&mut self) -> Option<SocketAddr> {
        self.check_timeout_at(Instant::now())
    }

    fn check_timeout_at(&mut self, now: Instant) -> Option<SocketAddr> {
        let expired = self
            .peer
            .as_ref()
            .filter(|p| now.duration_since(p.last_seen) > self.timeout)
            .map(|p| p.addr);
        if expired.is_some() {
            self.peer = None;
        }
        expired
    }

    /// Address of the live peer, if any.
    pub fn active_peer(&self) -> Option<SocketAddr> {
        self.peer.as_ref().map(|p| p.addr)
    }
}
