//! Barrier for one in-flight batch of `initial-batch` results.
//!
//! Results arrive one per message, tagged with their slot index, in any order. The
//! aggregator buffers them until the declared `total` has been received and then hands the
//! whole batch back exactly once, together with the entries that were served from cache.
//!
//! States:
//! - Idle — no [`BarrierState`]. The next result opens one, taking `total` from its message.
//! - Collecting — results are buffered by slot index, last write wins.
//! - Back to Idle the instant `current == total`; the state is dropped.
//!
//! Only one batch is collected at a time. Results of overlapping batches with the same
//! `total` land in the same state. A batch whose messages never all arrive keeps the
//! aggregator Collecting forever; there is no timeout.

use std::collections::BTreeMap;

use clap::ValueEnum;
use coinboard_common::net::MAX_SLOTS;
use coinboard_common::{TrackedItem, UpdateResult};
use log::{debug, info};
use strum_macros::Display;

/// How duplicate slot indices count toward completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Every message counts, even for a slot already filled. A duplicate can complete the
    /// batch before every slot has reported.
    #[default]
    CountEvery,
    /// Only the first message per slot counts.
    CountDistinct,
}

/// Buffer for the batch currently being collected.
#[derive(Debug)]
pub struct BarrierState {
    total: usize,
    current: usize,
    results: BTreeMap<usize, UpdateResult>,
}

impl BarrierState {
    fn new(total: usize) -> Self {
        Self {
            total,
            current: 0,
            results: BTreeMap::new(),
        }
    }
}

/// A batch whose every expected result has arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedBatch {
    /// Buffered results in ascending slot order.
    pub results: Vec<UpdateResult>,
    /// Successful entries served from cache, in ascending slot order.
    pub stale: Vec<TrackedItem>,
}

/// What recording one result did.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    /// Set when this result opened a new batch.
    pub opened: bool,
    /// Declared size of the batch.
    pub total: usize,
    /// Results counted so far, including this one.
    pub current: usize,
    /// Set when this result completed the batch.
    pub completed: Option<CompletedBatch>,
}

/// Collects `initial-batch` results and detects completion.
#[derive(Debug, Default)]
pub struct BarrierAggregator {
    state: Option<BarrierState>,
    policy: DuplicatePolicy,
}

impl BarrierAggregator {
    /// Idle aggregator using `policy` for duplicates.
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            state: None,
            policy,
        }
    }

    /// Whether a batch is being collected.
    pub fn is_collecting(&self) -> bool {
        self.state.is_some()
    }

    /// `(current, total)` of the batch being collected.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.state.as_ref().map(|s| (s.current, s.total))
    }

    /// Record one batch result.
    ///
    /// Returns `None` for results that cannot belong to a batch: a slot index outside the
    /// display, or a declared `total` of zero or above [`MAX_SLOTS`] when opening.
    pub fn record(&mut self, result: UpdateResult, total: usize) -> Option<Recorded> {
        if result.slot_index >= MAX_SLOTS {
            debug!("Ignoring result for slot {} outside the display", result.slot_index);
            return None;
        }

        let opened = self.state.is_none();
        if opened {
            if total == 0 || total > MAX_SLOTS {
                debug!("Ignoring batch with invalid total {}", total);
                return None;
            }
            info!("Opening barrier: total={}", total);
        }
        let state = self.state.get_or_insert_with(|| BarrierState::new(total));

        let slot_index = result.slot_index;
        let duplicate = state.results.insert(slot_index, result).is_some();
        if duplicate {
            debug!("Duplicate result for slot {}; last write wins", slot_index);
        }
        if !duplicate || self.policy == DuplicatePolicy::CountEvery {
            state.current += 1;
        }

        let (current, total) = (state.current, state.total);
        debug!("Barrier progress: {}/{}", current, total);
        let completed = if current >= total { self.complete() } else { None };
        Some(Recorded {
            opened,
            total,
            current,
            completed,
        })
    }

    fn complete(&mut self) -> Option<CompletedBatch> {
        let state = self.state.take()?;
        let results: Vec<UpdateResult> = state.results.into_values().collect();
        let stale: Vec<TrackedItem> = results.iter().filter_map(UpdateResult::stale_entry).collect();
        info!(
            "Barrier complete: results={}; stale={}",
            results.len(),
            stale.len()
        );
        Some(CompletedBatch { results, stale })
    }
}
