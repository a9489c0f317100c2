//! Paced refresh requests for stale slots.
//!
//! Entry `i` of a stale list is sent `i × stagger` after scheduling, so a batch of stale
//! entries trickles out at a fixed rate instead of flooding the channel.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use coinboard_common::{Message, TrackedItem, Transport};
use log::{error, info};

/// Sends `request-refresh` messages with linear pacing.
#[derive(Clone)]
pub struct RefreshScheduler {
    transport: Arc<dyn Transport>,
    stagger: Duration,
}

impl RefreshScheduler {
    /// Scheduler sending through `transport`, one request every `stagger`.
    pub fn new(transport: Arc<dyn Transport>, stagger: Duration) -> Self {
        Self { transport, stagger }
    }

    /// Request fresh data for every entry of `stale`.
    ///
    /// No-op when the list is empty or the channel is closed.
    pub fn schedule(&self, stale: Vec<TrackedItem>) -> Option<JoinHandle<()>> {
        if stale.is_empty() {
            return None;
        }
        if !self.transport.is_open() {
            error!("Channel not ready; dropping {} refresh requests", stale.len());
            return None;
        }
        info!("Requesting refresh for {} stale items", stale.len());

        let transport = Arc::clone(&self.transport);
        let stagger = self.stagger;
        Some(thread::spawn(move || {
            let start = Instant::now();
            for (index, entry) in stale.into_iter().enumerate() {
                let due = start + stagger * index as u32;
                let now = Instant::now();
                if due > now {
                    thread::sleep(due - now);
                }
                info!("Sending request for update: id={}", entry.id);
                let id = entry.id.clone();
                if let Err(e) = transport.send(&Message::RequestRefresh { value: entry }) {
                    error!("Failed to request refresh for {}: {}", id, e);
                }
            }
        }))
    }
}
