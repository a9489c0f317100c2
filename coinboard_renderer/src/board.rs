//! Text rendering of the display slots.
//!
//! The board has [`MAX_SLOTS`] positions. When a batch opens, slots below its `total` go
//! pending (hidden until their result renders) and the rest collapse. A successful result
//! fills its slot; a failure leaves the slot exactly as it was.

use coinboard_common::net::MAX_SLOTS;
use coinboard_common::{Quote, UpdateResult};
use log::debug;
use strum_macros::Display;

/// Colour cue of a filled slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Trend {
    /// 24h change is zero or positive.
    Up,
    /// 24h change is negative.
    Down,
    /// Value came from the provider's cache; shown dimmed until refreshed.
    Stale,
}

/// Visibility of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Part of the current batch, waiting for its result.
    Pending,
    /// Showing its content.
    Visible,
    /// Not used by the current batch.
    Collapsed,
}

/// One display position.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// Current visibility.
    pub visibility: Visibility,
    /// Last quote rendered into the slot.
    pub quote: Option<Quote>,
    /// Trend of the last rendered quote.
    pub trend: Option<Trend>,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            visibility: Visibility::Collapsed,
            quote: None,
            trend: None,
        }
    }
}

/// All display slots plus the loading indicator.
#[derive(Debug, Clone)]
pub struct SlotBoard {
    slots: Vec<Slot>,
    loading: bool,
}

impl Default for SlotBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotBoard {
    /// Empty board showing the loading indicator.
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::default(); MAX_SLOTS],
            loading: true,
        }
    }

    /// Whether the loading indicator is still shown.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Slot at `index`.
    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Prepare for a batch of `total` slots.
    pub fn begin_batch(&mut self, total: usize) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            slot.visibility = if index < total {
                Visibility::Pending
            } else {
                Visibility::Collapsed
            };
        }
    }

    /// Hide the loading indicator; called on the first complete render.
    pub fn finish_loading(&mut self) {
        self.loading = false;
    }

    /// Render one result into its slot. Returns `false` if nothing changed.
    pub fn apply(&mut self, result: &UpdateResult) -> bool {
        let Some(quote) = result.success_quote() else {
            debug!("No update for slot {}: status={}", result.slot_index, result.status);
            return false;
        };
        let Some(slot) = self.slots.get_mut(result.slot_index) else {
            debug!("No slot {} on the board", result.slot_index);
            return false;
        };
        let trend = if result.from_cache {
            Trend::Stale
        } else if quote.change_percent_24h >= 0.0 {
            Trend::Up
        } else {
            Trend::Down
        };
        slot.quote = Some(quote.clone());
        slot.trend = Some(trend);
        slot.visibility = Visibility::Visible;
        true
    }

    /// One line per visible slot, e.g. `[0] Bitcoin (BTC) 50000.50 +2.10% up`.
    pub fn render_lines(&self) -> Vec<String> {
        if self.loading {
            return vec!["Loading...".to_string()];
        }
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.visibility == Visibility::Visible)
            .filter_map(|(index, slot)| {
                let quote = slot.quote.as_ref()?;
                let trend = slot.trend?;
                Some(format!("[{}] {} {}", index, format_quote(quote), trend))
            })
            .collect()
    }
}

/// Price floored to cents with the signed 24h change, printed unrounded.
pub fn format_quote(quote: &Quote) -> String {
    let sign = if quote.change_percent_24h > 0.0 { "+" } else { "" };
    format!(
        "{} ({}) {} {}{}%",
        quote.display_name,
        quote.id,
        format_price(quote.price),
        sign,
        quote.change_percent_24h
    )
}

/// Price floored (not rounded) to two decimals.
pub fn format_price(price: f64) -> String {
    let cents = (price * 100.0).floor() as u64;
    format!("{}.{:02}", cents / 100, cents % 100)
}
