//! Renderer-side message handling.
//!
//! - `initial-batch` results go through the [`BarrierAggregator`]; the board is repainted
//!   only when a batch completes, after which stale entries are handed to the
//!   [`RefreshScheduler`].
//! - `refresh` results patch their slot directly and never touch the barrier, even while a
//!   batch is being collected.
//! - Provider-bound messages are ignored.

use std::thread::JoinHandle;

use coinboard_common::{Message, UpdateResult};
use log::{debug, info};

use crate::barrier::{BarrierAggregator, DuplicatePolicy};
use crate::board::SlotBoard;
use crate::scheduler::RefreshScheduler;

/// Effect of handling one message.
#[derive(Debug)]
pub enum Handled {
    /// The message was not meant for the renderer or could not belong to a batch.
    Ignored,
    /// A batch result was buffered; the batch is still incomplete.
    Buffered {
        /// Results counted so far.
        current: usize,
        /// Declared batch size.
        total: usize,
    },
    /// A batch completed and was rendered.
    Rendered {
        /// Sender of the refresh requests for stale entries, if any were due.
        refresh: Option<JoinHandle<()>>,
    },
    /// A refresh result was applied to its slot.
    Patched {
        /// Slot the result targeted.
        slot_index: usize,
        /// `false` for failures, which leave the slot as it was.
        changed: bool,
    },
}

/// Renderer state owned by the event loop.
pub struct Renderer {
    aggregator: BarrierAggregator,
    board: SlotBoard,
    scheduler: RefreshScheduler,
}

impl Renderer {
    /// Renderer requesting refreshes through `scheduler`.
    pub fn new(scheduler: RefreshScheduler, policy: DuplicatePolicy) -> Self {
        Self {
            aggregator: BarrierAggregator::new(policy),
            board: SlotBoard::new(),
            scheduler,
        }
    }

    /// Current board.
    pub fn board(&self) -> &SlotBoard {
        &self.board
    }

    /// Barrier of the batch being collected.
    pub fn aggregator(&self) -> &BarrierAggregator {
        &self.aggregator
    }

    /// Dispatch one incoming message.
    pub fn handle(&mut self, message: Message) -> Handled {
        match message {
            Message::InitialBatch { data, total } => self.on_batch_result(data, total),
            Message::Refresh { data } => self.on_refresh(data),
            other => {
                debug!("Ignoring {} sent to renderer", other.kind_name());
                Handled::Ignored
            }
        }
    }

    fn on_batch_result(&mut self, result: UpdateResult, total: usize) -> Handled {
        let Some(recorded) = self.aggregator.record(result, total) else {
            return Handled::Ignored;
        };
        if recorded.opened {
            self.board.begin_batch(recorded.total);
        }
        match recorded.completed {
            Some(batch) => {
                self.board.finish_loading();
                for result in &batch.results {
                    self.board.apply(result);
                }
                info!("Rendered batch of {}", batch.results.len());
                Handled::Rendered {
                    refresh: self.scheduler.schedule(batch.stale),
                }
            }
            None => Handled::Buffered {
                current: recorded.current,
                total: recorded.total,
            },
        }
    }

    fn on_refresh(&mut self, result: UpdateResult) -> Handled {
        info!(
            "Refresh result: index={}; status={}",
            result.slot_index, result.status
        );
        Handled::Patched {
            slot_index: result.slot_index,
            changed: self.board.apply(&result),
        }
    }
}
