//! Batch dispatch of tracked items to the renderer.
//!
//! A dispatch resolves every item on its own scoped thread, waits for all of them to
//! settle, then emits one message per item in input order with a fixed delay before each
//! send. Failures become `status = failure` results and never abort the batch. Items whose
//! send finds the transport closed are logged and dropped; nothing is retried.
//!
//! `dispatch` is fire-and-forget from the event loop's point of view: all of the above runs
//! on a spawned thread.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use coinboard_common::{EventKind, Message, TrackedItem, Transport, UpdateResult};
use log::{debug, error, info};

use crate::resolver::Resolver;

/// Resolves and emits batches of tracked items.
#[derive(Clone)]
pub struct BatchDispatcher {
    resolver: Arc<Resolver>,
    transport: Arc<dyn Transport>,
    stagger: Duration,
}

impl BatchDispatcher {
    /// Create a dispatcher sending through `transport`, waiting `stagger` before each send.
    pub fn new(resolver: Arc<Resolver>, transport: Arc<dyn Transport>, stagger: Duration) -> Self {
        Self {
            resolver,
            transport,
            stagger,
        }
    }

    /// Resolver shared with this dispatcher.
    pub fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }

    /// Resolve and emit `items` on a background thread.
    pub fn dispatch(
        &self,
        items: Vec<TrackedItem>,
        kind: EventKind,
        prefer_cache: bool,
    ) -> JoinHandle<()> {
        let dispatcher = self.clone();
        thread::spawn(move || {
            dispatcher.run(&items, kind, prefer_cache);
        })
    }

    /// Resolve and emit `items` on the calling thread. Returns the number of messages sent.
    pub fn run(&self, items: &[TrackedItem], kind: EventKind, prefer_cache: bool) -> usize {
        info!(
            "Dispatching batch: event={}; items={}; prefer_cache={}",
            kind,
            items.len(),
            prefer_cache
        );
        let results = self.resolve_all(items, prefer_cache);
        self.emit(kind, results)
    }

    /// Resolve every item concurrently; results keep input order.
    pub fn resolve_all(&self, items: &[TrackedItem], prefer_cache: bool) -> Vec<UpdateResult> {
        thread::scope(|scope| {
            let handles: Vec<_> = items
                .iter()
                .map(|item| scope.spawn(move || self.resolve_item(item, prefer_cache)))
                .collect();
            handles
                .into_iter()
                .zip(items)
                .map(|(handle, item)| {
                    handle
                        .join()
                        .unwrap_or_else(|_| {
                            error!("Resolution thread panicked: id={}", item.id);
                            UpdateResult::failure(item.slot_index)
                        })
                })
                .collect()
        })
    }

    fn resolve_item(&self, item: &TrackedItem, prefer_cache: bool) -> UpdateResult {
        match self.resolver.resolve(&item.id, prefer_cache) {
            Ok(resolved) => {
                debug!("Successfully fetched update: id={}", item.id);
                UpdateResult::success(item.slot_index, resolved.quote, resolved.from_cache)
            }
            Err(e) => {
                error!("Failed to update: id={}; {}", item.id, e);
                UpdateResult::failure(item.slot_index)
            }
        }
    }

    /// Send one message per result, staggered. Returns the number of messages sent.
    pub fn emit(&self, kind: EventKind, results: Vec<UpdateResult>) -> usize {
        let total = results.len();
        let mut sent = 0;
        for result in results {
            if !self.stagger.is_zero() {
                thread::sleep(self.stagger);
            }
            let slot_index = result.slot_index;
            let message = Message::update(kind, result, total);
            match self.transport.send(&message) {
                Ok(()) => {
                    debug!("Sent {}: index={}; total={}", kind, slot_index, total);
                    sent += 1;
                }
                Err(e) => error!("Dropping {} for index {}: {}", kind, slot_index, e),
            }
        }
        sent
    }
}
