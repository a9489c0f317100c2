//! Provider-side message handling.
//!
//! Maps each incoming message type to its action:
//! - `init` — resolve the full tracked list cache-first and dispatch it as `initial-batch`.
//! - `request-refresh` — force-fetch the single referenced item and dispatch it as `refresh`.
//! - `ping` — keep-alive only; handled by the event loop's peer tracking.
//! - anything else — not meant for the provider; ignored.
//!
//! The periodic timer, settings changes and a newly connected renderer reuse the same
//! full-batch entry point. Each dispatch runs on its own thread, fallback lookup included,
//! so overlapping batches are possible.

use std::thread::{self, JoinHandle};

use coinboard_common::{EventKind, Message, Result, TrackedItem};
use log::{debug, error, info};

use crate::dispatcher::BatchDispatcher;

/// How many items the fallback list contains.
pub const FALLBACK_COUNT: usize = 5;

/// Provider state shared by the event loop handlers.
pub struct Provider {
    dispatcher: BatchDispatcher,
    tracked: Vec<TrackedItem>,
}

impl Provider {
    /// Create a provider tracking `tracked` (empty means "use the fallback list").
    pub fn new(dispatcher: BatchDispatcher, tracked: Vec<TrackedItem>) -> Self {
        Self { dispatcher, tracked }
    }

    /// Replace the tracked list, e.g. after a settings change.
    pub fn set_tracked(&mut self, tracked: Vec<TrackedItem>) {
        self.tracked = tracked;
    }

    /// Dispatch one message. Returns the spawned dispatch, if any.
    pub fn handle(&self, message: Message) -> Option<JoinHandle<()>> {
        debug!("Handling message: type={}", message.kind_name());
        match message {
            Message::Init => Some(self.full_refresh()),
            Message::RequestRefresh { value } => {
                info!("Refresh requested: index={}; id={}", value.slot_index, value.id);
                Some(self.dispatcher.dispatch(vec![value], EventKind::Refresh, false))
            }
            Message::Ping => None,
            other => {
                debug!("Ignoring {} sent to provider", other.kind_name());
                None
            }
        }
    }

    /// Start a full batch for a renderer that just (re)connected.
    ///
    /// A renderer whose `init` was lost only shows up through its pings; this gives it a
    /// batch without waiting for the periodic refresh. `init` itself is left to [`handle`].
    ///
    /// [`handle`]: Provider::handle
    pub fn on_connect(&self, first: &Message) -> Option<JoinHandle<()>> {
        match first {
            Message::Init => None,
            other => {
                info!("Renderer connected with {}; sending full batch", other.kind_name());
                Some(self.full_refresh())
            }
        }
    }

    /// Resolve the tracked list (or the fallback) and dispatch it as `initial-batch`.
    pub fn full_refresh(&self) -> JoinHandle<()> {
        let dispatcher = self.dispatcher.clone();
        let tracked = self.tracked.clone();
        thread::spawn(move || match tracked_or_fallback(&dispatcher, tracked) {
            Ok(items) if items.is_empty() => {
                error!("Nothing to track: fallback list is empty");
            }
            Ok(items) => {
                dispatcher.run(&items, EventKind::InitialBatch, true);
            }
            Err(e) => error!("Failed to load fallback list: {}", e),
        })
    }

    /// Configured items, or the fetcher's top items when none are configured.
    pub fn tracked_or_fallback(&self) -> Result<Vec<TrackedItem>> {
        tracked_or_fallback(&self.dispatcher, self.tracked.clone())
    }
}

fn tracked_or_fallback(dispatcher: &BatchDispatcher, tracked: Vec<TrackedItem>) -> Result<Vec<TrackedItem>> {
    if !tracked.is_empty() {
        return Ok(tracked);
    }
    info!("No tracked items configured; using fallback list");
    let ids = dispatcher.resolver().fallback_ids(FALLBACK_COUNT)?;
    Ok(TrackedItem::from_ids(ids))
}
