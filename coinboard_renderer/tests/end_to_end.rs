use std::sync::Arc;
use std::time::Duration;

use coinboard_common::transport::ChannelTransport;
use coinboard_common::{Message, Quote, TrackedItem};
use coinboard_provider::cache::{CacheStore, MemoryCache};
use coinboard_provider::dispatcher::BatchDispatcher;
use coinboard_provider::fetcher::SimulatedFetcher;
use coinboard_provider::provider::Provider;
use coinboard_provider::resolver::Resolver;
use coinboard_renderer::barrier::DuplicatePolicy;
use coinboard_renderer::board::Trend;
use coinboard_renderer::renderer::{Handled, Renderer};
use coinboard_renderer::scheduler::RefreshScheduler;
use coinboard_renderer::sender::RequestSender;

#[test]
fn test_stale_slot_is_refreshed_after_batch_render() {
    let (to_renderer, renderer_inbox) = ChannelTransport::new();
    let (to_provider, provider_inbox) = ChannelTransport::new();
    let to_provider = Arc::new(to_provider);

    let mut cache = MemoryCache::new();
    cache
        .put("BTC", &Quote::new("BTC", "Bitcoin", 1.0, 0.0).unwrap())
        .unwrap();
    let resolver = Arc::new(Resolver::new(Arc::new(SimulatedFetcher::new()), Box::new(cache)));
    let dispatcher = BatchDispatcher::new(resolver, Arc::new(to_renderer), Duration::ZERO);
    let provider = Provider::new(dispatcher, TrackedItem::from_ids(["BTC", "ETH", "LTC"]));

    let scheduler = RefreshScheduler::new(to_provider.clone(), Duration::ZERO);
    let mut renderer = Renderer::new(scheduler, DuplicatePolicy::CountEvery);

    RequestSender::send_init(to_provider.as_ref()).unwrap();
    for message in provider_inbox.try_iter() {
        provider.handle(message).unwrap().join().unwrap();
    }

    // Deliver the batch out of order.
    let mut batch: Vec<Message> = renderer_inbox.try_iter().collect();
    assert_eq!(batch.len(), 3);
    batch.reverse();
    let mut renders = 0;
    for message in batch {
        if let Handled::Rendered { refresh } = renderer.handle(message) {
            renders += 1;
            refresh.unwrap().join().unwrap();
        }
    }
    assert_eq!(renders, 1);
    assert_eq!(renderer.board().slot(0).unwrap().trend, Some(Trend::Stale));
    assert_eq!(renderer.board().slot(0).unwrap().quote.as_ref().unwrap().price, 1.0);

    let requests: Vec<Message> = provider_inbox.try_iter().collect();
    assert_eq!(
        requests,
        vec![Message::RequestRefresh {
            value: TrackedItem::new(0, "BTC")
        }]
    );
    for message in requests {
        provider.handle(message).unwrap().join().unwrap();
    }

    for message in renderer_inbox.try_iter() {
        assert!(matches!(
            renderer.handle(message),
            Handled::Patched { slot_index: 0, changed: true }
        ));
    }
    let slot = renderer.board().slot(0).unwrap();
    assert_ne!(slot.trend, Some(Trend::Stale));
    assert!(slot.quote.as_ref().unwrap().price > 40000.0);
}
