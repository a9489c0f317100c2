//! Per-slot update payloads exchanged between provider and renderer.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::quote::Quote;

/// Binds a tracked item id to a display slot.
///
/// The same shape is used for the stale entries the renderer asks to refresh.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackedItem {
    /// Display slot, `0..MAX_SLOTS`.
    #[serde(rename = "index")]
    pub slot_index: usize,
    /// Item id, e.g. `BTC`.
    pub id: String,
}

impl TrackedItem {
    /// Creates a new slot binding.
    pub fn new(slot_index: usize, id: &str) -> Self {
        TrackedItem {
            slot_index,
            id: id.to_string(),
        }
    }

    /// Binds `ids` to consecutive slots starting at zero.
    pub fn from_ids<I, S>(ids: I) -> Vec<TrackedItem>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .enumerate()
            .map(|(slot_index, id)| TrackedItem::new(slot_index, id.as_ref()))
            .collect()
    }
}

/// Outcome of resolving one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    /// The item resolved to a quote.
    Success,
    /// The item could not be resolved; no quote is attached.
    Failure,
}

/// Kind of event carrying an [`UpdateResult`] to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum EventKind {
    /// Part of a full batch; buffered by the renderer's barrier.
    InitialBatch,
    /// Single-item refresh; applied to its slot directly.
    Refresh,
}

/// Resolution result for one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    /// Slot the result belongs to.
    #[serde(rename = "index")]
    pub slot_index: usize,
    /// Resolved quote; `None` iff `status` is [`Status::Failure`].
    pub quote: Option<Quote>,
    /// Resolution outcome.
    pub status: Status,
    /// Whether the quote was served from the provider's cache.
    pub from_cache: bool,
}

impl UpdateResult {
    /// Successful resolution.
    pub fn success(slot_index: usize, quote: Quote, from_cache: bool) -> Self {
        UpdateResult {
            slot_index,
            quote: Some(quote),
            status: Status::Success,
            from_cache,
        }
    }

    /// Failed resolution. Never marked as served from cache.
    pub fn failure(slot_index: usize) -> Self {
        UpdateResult {
            slot_index,
            quote: None,
            status: Status::Failure,
            from_cache: false,
        }
    }

    /// Quote carried by a successful result.
    ///
    /// Returns `None` for failures, including malformed payloads that claim success
    /// without a quote or failure with one.
    pub fn success_quote(&self) -> Option<&Quote> {
        match self.status {
            Status::Success => self.quote.as_ref(),
            Status::Failure => None,
        }
    }

    /// Stale entry for this result, if its quote came from cache.
    pub fn stale_entry(&self) -> Option<TrackedItem> {
        if !self.from_cache {
            return None;
        }
        self.success_quote()
            .map(|quote| TrackedItem::new(self.slot_index, &quote.id))
    }
}
