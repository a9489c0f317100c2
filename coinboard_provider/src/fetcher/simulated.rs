//! Offline quote source.
//!
//! Synthesizes quotes with a small random walk around the last price of each id so the
//! whole pipeline can run without network access. Unknown ids start at a fixed seed price.

use std::collections::HashMap;
use std::sync::Mutex;

use coinboard_common::{Quote, Result};
use rand::Rng;

use super::QuoteFetcher;

const SEED_PRICE: f64 = 100.0;

/// Known ids with their display names and seed prices, in rank order.
const KNOWN: &[(&str, &str, f64)] = &[
    ("BTC", "Bitcoin", 50000.0),
    ("ETH", "Ethereum", 3000.0),
    ("XRP", "XRP", 0.5),
    ("LTC", "Litecoin", 80.0),
    ("BCH", "Bitcoin Cash", 250.0),
    ("ADA", "Cardano", 0.4),
    ("DOGE", "Dogecoin", 0.08),
];

/// Random-walk quote source. Each id keeps its own last price and 24h open.
pub struct SimulatedFetcher {
    state: Mutex<HashMap<String, (f64, f64)>>,
}

impl SimulatedFetcher {
    /// Create a fetcher seeded with the known ids.
    pub fn new() -> Self {
        let state = KNOWN
            .iter()
            .map(|(id, _, price)| (id.to_string(), (*price, *price)))
            .collect();
        Self {
            state: Mutex::new(state),
        }
    }

    /// Calculate the next synthetic price using a small random walk around `current_price`.
    ///
    /// The change is sampled uniformly from `[-1%, +1%]` and the result is clamped to a
    /// small positive minimum.
    pub fn next_price(current_price: f64) -> f64 {
        let mut rng = rand::rng();
        let change: f64 = rng.random_range(-0.01..0.01);
        let new_price = current_price * (1.0 + change);
        new_price.max(0.0001)
    }

    fn display_name(id: &str) -> &str {
        KNOWN
            .iter()
            .find(|(known, _, _)| *known == id)
            .map(|(_, name, _)| *name)
            .unwrap_or(id)
    }
}

impl Default for SimulatedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteFetcher for SimulatedFetcher {
    fn fetch(&self, id: &str) -> Result<Quote> {
        let mut state = self.state.lock()?;
        let (price, open) = state
            .entry(id.to_string())
            .or_insert((SEED_PRICE, SEED_PRICE));
        *price = Self::next_price(*price);
        let change = (*price - *open) / *open * 100.0;
        Quote::new(id, Self::display_name(id), *price, (change * 100.0).round() / 100.0)
    }

    fn top_ids(&self, limit: usize) -> Result<Vec<String>> {
        Ok(KNOWN
            .iter()
            .take(limit)
            .map(|(id, _, _)| id.to_string())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_price_stays_within_one_percent() {
        for _ in 0..100 {
            let next = SimulatedFetcher::next_price(100.0);
            assert!((99.0..=101.0).contains(&next));
        }
    }

    #[test]
    fn test_fetch_known_and_unknown_ids() {
        let fetcher = SimulatedFetcher::new();
        let btc = fetcher.fetch("BTC").unwrap();
        assert_eq!(btc.display_name, "Bitcoin");
        assert!(btc.price > 49000.0 && btc.price < 51000.0);

        let other = fetcher.fetch("XYZ").unwrap();
        assert_eq!(other.display_name, "XYZ");
        assert!(other.price > 98.0 && other.price < 102.0);
    }

    #[test]
    fn test_top_ids_respects_limit() {
        let fetcher = SimulatedFetcher::new();
        assert_eq!(
            fetcher.top_ids(2).unwrap(),
            vec!["BTC".to_string(), "ETH".to_string()]
        );
    }
}
