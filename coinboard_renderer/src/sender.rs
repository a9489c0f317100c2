//! Outbound requests from the renderer to the provider.
//!
//! This module sends the initial `init` request and runs a background keep-alive loop so
//! the provider keeps treating this renderer as connected.
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use coinboard_common::{Message, Result, Transport};
use log::{debug, error, info};

/// Helper type for sending requests to the provider.
pub struct RequestSender;

impl RequestSender {
    /// Ask the provider for a full batch.
    pub fn send_init(transport: &dyn Transport) -> Result<()> {
        info!("Sending init request");
        transport.send(&Message::Init)
    }

    /// Spawn a thread sending `ping` every `interval` until `shutdown` is set.
    pub fn start_ping_thread(
        transport: Arc<dyn Transport>,
        interval: Duration,
        shutdown: Arc<AtomicBool>,
    ) -> JoinHandle<()> {
        info!("Ping thread started. Interval: {:?}", interval);
        thread::spawn(move || {
            while !shutdown.load(Ordering::Relaxed) {
                thread::sleep(interval);
                if shutdown.load(Ordering::Relaxed) {
                    break;
                }
                match transport.send(&Message::Ping) {
                    Ok(()) => debug!("PING sent"),
                    Err(e) => error!("PING THREAD ERROR: Failed to send PING: {}", e),
                }
            }
            info!("Ping thread stopping...");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinboard_common::transport::ChannelTransport;

    #[test]
    fn test_ping_thread_pings_until_shutdown() {
        let (transport, rx) = ChannelTransport::new();
        let shutdown = Arc::new(AtomicBool::new(false));
        let handle = RequestSender::start_ping_thread(
            Arc::new(transport),
            Duration::from_millis(5),
            Arc::clone(&shutdown),
        );

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), Message::Ping);
        shutdown.store(true, Ordering::Relaxed);
        handle.join().unwrap();
    }

    #[test]
    fn test_init_fails_on_closed_channel() {
        let (transport, _rx) = ChannelTransport::new();
        transport.set_open(false);
        assert!(RequestSender::send_init(&transport).is_err());
    }
}
