//! Provider side of coinboard.
//!
//! Owns network access and the quote cache, and answers renderer requests:
//! - `cache` — last-value quote stores (memory and JSON file).
//! - `fetcher` — remote quote sources behind the `QuoteFetcher` trait.
//! - `resolver` — cache-or-fetch resolution of one item.
//! - `dispatcher` — resolves a list of tracked items and emits staggered results.
//! - `provider` — maps incoming messages to dispatches.
//! - `settings` — tracked-list configuration and change polling.
//! - `peer_monitor` — renderer keep-alive tracking.
pub mod cache;
pub mod dispatcher;
pub mod fetcher;
pub mod peer_monitor;
pub mod provider;
pub mod resolver;
pub mod settings;
