//! Remote quote sources.
//!
//! The resolver only sees the [`QuoteFetcher`] trait:
//! - `coincap` — HTTP client for the CoinCap quote API.
//! - `simulated` — offline random-walk source for demos and local runs.
use coinboard_common::{Quote, Result};

pub mod coincap;
pub mod simulated;

pub use coincap::CoinCapFetcher;
pub use simulated::SimulatedFetcher;

/// Source of fresh quotes. Each call is one remote round-trip.
pub trait QuoteFetcher: Send + Sync {
    /// Fetch the current quote for `id`.
    fn fetch(&self, id: &str) -> Result<Quote>;

    /// Ids of the `limit` top-ranked items, used when nothing is configured.
    fn top_ids(&self, limit: usize) -> Result<Vec<String>>;
}
