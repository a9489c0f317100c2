use std::sync::Arc;
use std::time::Duration;

use coinboard_common::transport::ChannelTransport;
use coinboard_common::{EventKind, Message, Quote, TrackedItem, UpdateResult};
use coinboard_renderer::barrier::DuplicatePolicy;
use coinboard_renderer::board::{Trend, Visibility};
use coinboard_renderer::renderer::{Handled, Renderer};
use coinboard_renderer::scheduler::RefreshScheduler;
use crossbeam_channel::Receiver;

fn renderer(policy: DuplicatePolicy) -> (Renderer, Arc<ChannelTransport>, Receiver<Message>) {
    let (transport, rx) = ChannelTransport::new();
    let transport = Arc::new(transport);
    let scheduler = RefreshScheduler::new(transport.clone(), Duration::ZERO);
    (Renderer::new(scheduler, policy), transport, rx)
}

fn btc(from_cache: bool) -> UpdateResult {
    let quote = Quote::new("BTC", "Bitcoin", 50000.5, 2.1).unwrap();
    UpdateResult::success(0, quote, from_cache)
}

fn eth(from_cache: bool) -> UpdateResult {
    let quote = Quote::new("ETH", "Ethereum", 3000.25, -1.0).unwrap();
    UpdateResult::success(1, quote, from_cache)
}

fn batch(data: UpdateResult, total: usize) -> Message {
    Message::update(EventKind::InitialBatch, data, total)
}

fn wait_refresh(handled: Handled) {
    match handled {
        Handled::Rendered { refresh } => {
            if let Some(handle) = refresh {
                handle.join().unwrap();
            }
        }
        other => panic!("expected a render, got {:?}", other),
    }
}

#[test]
fn test_fresh_batch_renders_without_refresh_requests() {
    let (mut renderer, _transport, rx) = renderer(DuplicatePolicy::CountEvery);

    // Arrival order reversed relative to send order.
    assert!(matches!(
        renderer.handle(batch(eth(false), 2)),
        Handled::Buffered { current: 1, total: 2 }
    ));
    assert_eq!(renderer.board().slot(0).unwrap().visibility, Visibility::Pending);
    assert!(renderer.board().slot(1).unwrap().quote.is_none());

    match renderer.handle(batch(btc(false), 2)) {
        Handled::Rendered { refresh } => assert!(refresh.is_none()),
        other => panic!("expected a render, got {:?}", other),
    }
    assert!(!renderer.board().is_loading());
    assert_eq!(renderer.board().slot(0).unwrap().trend, Some(Trend::Up));
    assert_eq!(renderer.board().slot(1).unwrap().trend, Some(Trend::Down));
    assert_eq!(renderer.board().slot(2).unwrap().visibility, Visibility::Collapsed);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_cached_entry_triggers_single_refresh_request() {
    let (mut renderer, _transport, rx) = renderer(DuplicatePolicy::CountEvery);

    renderer.handle(batch(btc(true), 2));
    wait_refresh(renderer.handle(batch(eth(false), 2)));

    assert_eq!(renderer.board().slot(0).unwrap().trend, Some(Trend::Stale));
    let requests: Vec<Message> = rx.try_iter().collect();
    assert_eq!(
        requests,
        vec![Message::RequestRefresh {
            value: TrackedItem::new(0, "BTC")
        }]
    );

    // The provider answers with a fresh value; the slot is patched in place.
    match renderer.handle(Message::update(EventKind::Refresh, btc(false), 1)) {
        Handled::Patched { slot_index, changed } => {
            assert_eq!(slot_index, 0);
            assert!(changed);
        }
        other => panic!("expected a patch, got {:?}", other),
    }
    assert_eq!(renderer.board().slot(0).unwrap().trend, Some(Trend::Up));
    assert!(!renderer.aggregator().is_collecting());
}

#[test]
fn test_incomplete_batch_never_renders() {
    let (mut renderer, _transport, rx) = renderer(DuplicatePolicy::CountEvery);

    renderer.handle(batch(btc(true), 3));
    renderer.handle(batch(eth(true), 3));

    assert_eq!(renderer.aggregator().progress(), Some((2, 3)));
    assert!(renderer.board().is_loading());
    assert!(renderer.board().slot(0).unwrap().quote.is_none());
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_refresh_during_collection_bypasses_barrier() {
    let (mut renderer, _transport, _rx) = renderer(DuplicatePolicy::CountEvery);

    renderer.handle(batch(btc(false), 2));
    renderer.handle(Message::update(EventKind::Refresh, eth(false), 1));

    assert_eq!(renderer.aggregator().progress(), Some((1, 2)));
    assert!(renderer.board().slot(1).unwrap().quote.is_some());
}

#[test]
fn test_refresh_while_idle_creates_no_barrier() {
    let (mut renderer, _transport, _rx) = renderer(DuplicatePolicy::CountEvery);
    renderer.handle(Message::update(EventKind::Refresh, UpdateResult::failure(0), 1));
    assert!(!renderer.aggregator().is_collecting());
}

#[test]
fn test_failure_in_batch_does_not_block_completion() {
    let (mut renderer, _transport, rx) = renderer(DuplicatePolicy::CountDistinct);

    renderer.handle(batch(UpdateResult::failure(0), 2));
    wait_refresh(renderer.handle(batch(eth(true), 2)));

    let slot = renderer.board().slot(0).unwrap();
    assert!(slot.quote.is_none());
    assert_eq!(slot.visibility, Visibility::Pending);
    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        vec![Message::RequestRefresh {
            value: TrackedItem::new(1, "ETH")
        }]
    );
}

#[test]
fn test_stale_refresh_skipped_when_channel_closed() {
    let (mut renderer, transport, rx) = renderer(DuplicatePolicy::CountEvery);
    transport.set_open(false);

    match renderer.handle(batch(btc(true), 1)) {
        Handled::Rendered { refresh } => assert!(refresh.is_none()),
        other => panic!("expected a render, got {:?}", other),
    }
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_provider_bound_messages_ignored() {
    let (mut renderer, _transport, _rx) = renderer(DuplicatePolicy::CountEvery);
    assert!(matches!(renderer.handle(Message::Init), Handled::Ignored));
    assert!(matches!(renderer.handle(Message::Ping), Handled::Ignored));
}
