use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use coinboard_common::transport::ChannelTransport;
use coinboard_common::{CoinboardError, Message, Quote, Result, Status, TrackedItem};
use coinboard_provider::cache::{CacheStore, FileCache};
use coinboard_provider::dispatcher::BatchDispatcher;
use coinboard_provider::fetcher::QuoteFetcher;
use coinboard_provider::provider::Provider;
use coinboard_provider::resolver::Resolver;
use crossbeam_channel::Receiver;

/// Fetcher with scripted prices that records which ids were fetched.
struct ScriptedFetcher {
    prices: Mutex<HashMap<String, (f64, f64)>>,
    fetched: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    fn new() -> Arc<Self> {
        let prices = HashMap::from([
            ("BTC".to_string(), (50000.5, 2.1)),
            ("ETH".to_string(), (3000.25, -1.0)),
        ]);
        Arc::new(Self {
            prices: Mutex::new(prices),
            fetched: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl QuoteFetcher for ScriptedFetcher {
    fn fetch(&self, id: &str) -> Result<Quote> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.fetched.lock().unwrap().push(id.to_string());
        let prices = self.prices.lock().unwrap();
        let (price, change) = prices
            .get(id)
            .ok_or_else(|| CoinboardError::fetch(id, "unknown id"))?;
        Quote::new(id, id, *price, *change)
    }

    fn top_ids(&self, limit: usize) -> Result<Vec<String>> {
        Ok(["BTC", "ETH"].iter().take(limit).map(|s| s.to_string()).collect())
    }
}

fn provider_with(
    fetcher: Arc<ScriptedFetcher>,
    cache: Box<dyn CacheStore>,
    tracked: Vec<TrackedItem>,
) -> (Provider, Receiver<Message>) {
    let (transport, rx) = ChannelTransport::new();
    let resolver = Arc::new(Resolver::new(fetcher, cache));
    let dispatcher = BatchDispatcher::new(resolver, Arc::new(transport), Duration::ZERO);
    (Provider::new(dispatcher, tracked), rx)
}

#[test]
fn test_cached_item_served_then_force_refreshed() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cache.json");

    // An earlier run left BTC in the persisted cache.
    {
        let mut cache = FileCache::open(&cache_path).unwrap();
        cache
            .put("BTC", &Quote::new("BTC", "BTC", 42000.0, 0.5).unwrap())
            .unwrap();
    }

    let fetcher = ScriptedFetcher::new();
    let (provider, rx) = provider_with(
        fetcher.clone(),
        Box::new(FileCache::open(&cache_path).unwrap()),
        TrackedItem::from_ids(["BTC", "ETH"]),
    );

    provider.handle(Message::Init).unwrap().join().unwrap();
    let batch: Vec<Message> = rx.try_iter().collect();
    assert_eq!(batch.len(), 2);
    match (&batch[0], &batch[1]) {
        (
            Message::InitialBatch { data: btc, total: 2 },
            Message::InitialBatch { data: eth, total: 2 },
        ) => {
            assert!(btc.from_cache);
            assert_eq!(btc.success_quote().unwrap().price, 42000.0);
            assert!(!eth.from_cache);
            assert_eq!(eth.status, Status::Success);
        }
        other => panic!("unexpected batch {:?}", other),
    }
    assert_eq!(fetcher.fetched(), vec!["ETH".to_string()]);

    provider
        .handle(Message::RequestRefresh {
            value: TrackedItem::new(0, "BTC"),
        })
        .unwrap()
        .join()
        .unwrap();
    match rx.try_recv().unwrap() {
        Message::Refresh { data } => {
            assert_eq!(data.slot_index, 0);
            assert!(!data.from_cache);
            assert_eq!(data.success_quote().unwrap().price, 50000.5);
        }
        other => panic!("unexpected message {:?}", other),
    }
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);

    // The forced fetch overwrote the persisted entry.
    let reopened = FileCache::open(&cache_path).unwrap();
    assert_eq!(reopened.get("BTC").unwrap().price, 50000.5);
}

#[test]
fn test_refresh_of_unknown_item_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = ScriptedFetcher::new();
    let (provider, rx) = provider_with(
        fetcher,
        Box::new(FileCache::open(&dir.path().join("cache.json")).unwrap()),
        Vec::new(),
    );

    provider
        .handle(Message::RequestRefresh {
            value: TrackedItem::new(2, "NOPE"),
        })
        .unwrap()
        .join()
        .unwrap();
    match rx.try_recv().unwrap() {
        Message::Refresh { data } => {
            assert_eq!(data.slot_index, 2);
            assert_eq!(data.status, Status::Failure);
            assert!(data.quote.is_none());
        }
        other => panic!("unexpected message {:?}", other),
    }
}
