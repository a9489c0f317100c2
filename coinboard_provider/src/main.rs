//! Coinboard quote provider.
//!
//! This binary owns network access and the quote cache and serves a single renderer over
//! UDP. It wires together:
//!
//! - `UdpTransport` — receives renderer messages on a background thread and sends results
//!   back to the last renderer address seen.
//! - `PeerMonitor` — expires the renderer after a period of silence, closing the channel.
//! - `Provider` — maps `init` and `request-refresh` to batch dispatches.
//! - `SettingsWatcher` — polls the tracked-list file and triggers a full refresh on change.
//!
//! Concurrency and shutdown:
//! - One crossbeam `select!` loop multiplexes incoming messages, the periodic full refresh,
//!   the settings poll, the peer keep-alive check and Ctrl+C.
//! - Fetches and staggered sends run on dispatch threads and never block the loop.
//!
//! Usage example (CLI):
//! ```bash
//! coinboard_provider --settings ./coins.json --cache ./quote_cache.json
//! ```
#![warn(missing_docs)]
mod args;

use crate::args::Args;
use clap::Parser;
use coinboard_common::net::{PEER_TIMEOUT, SEND_STAGGER, addr};
use coinboard_common::transport::UdpTransport;
use coinboard_common::{CoinboardError, Result};
use coinboard_provider::cache::{CacheStore, FileCache};
use coinboard_provider::dispatcher::BatchDispatcher;
use coinboard_provider::fetcher::{CoinCapFetcher, QuoteFetcher, SimulatedFetcher};
use coinboard_provider::peer_monitor::PeerMonitor;
use coinboard_provider::provider::Provider;
use coinboard_provider::resolver::Resolver;
use coinboard_provider::settings::SettingsWatcher;
use crossbeam_channel::{bounded, select, tick, unbounded};
use log::{error, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// How often the settings file is re-read.
const SETTINGS_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// How often the renderer keep-alive is checked.
const PEER_CHECK_INTERVAL: Duration = Duration::from_secs(1);

fn main() -> Result<(), CoinboardError> {
    init_logger();
    let args = Args::parse();

    let shutdown = Arc::new(AtomicBool::new(false));
    let (stop_tx, stop_rx) = bounded::<()>(1);
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down provider...");
            shutdown.store(true, Ordering::SeqCst);
            let _ = stop_tx.try_send(());
        })
        .map_err(|e| CoinboardError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;
    }

    let transport = Arc::new(UdpTransport::bind(&addr("0.0.0.0", args.port))?);
    let (msg_tx, msg_rx) = unbounded();
    let receiver = transport.spawn_receiver(msg_tx, Arc::clone(&shutdown));

    let fetcher: Arc<dyn QuoteFetcher> = if args.offline {
        warn!("Offline mode: serving simulated quotes");
        Arc::new(SimulatedFetcher::new())
    } else {
        Arc::new(CoinCapFetcher::new(&args.api_base)?)
    };
    let cache: Box<dyn CacheStore> = Box::new(FileCache::open(&args.cache)?);
    let resolver = Arc::new(Resolver::new(fetcher, cache));
    let dispatcher = BatchDispatcher::new(resolver, transport.clone(), SEND_STAGGER);

    let mut watcher = SettingsWatcher::new(&args.settings);
    info!(
        "Tracking {} configured items from {}",
        watcher.current().len(),
        watcher.path().display()
    );
    let mut provider = Provider::new(dispatcher, watcher.current());
    let mut peers = PeerMonitor::new(PEER_TIMEOUT);

    let full_refresh = tick(Duration::from_secs(args.refresh_interval_secs));
    let settings_poll = tick(SETTINGS_POLL_INTERVAL);
    let peer_check = tick(PEER_CHECK_INTERVAL);

    loop {
        select! {
            recv(msg_rx) -> msg => match msg {
                Ok((message, from)) => {
                    let connected = peers.touch(from);
                    transport.set_peer(Some(from))?;
                    if connected {
                        info!("Renderer connected from {}", from);
                        provider.on_connect(&message);
                    }
                    provider.handle(message);
                }
                Err(e) => {
                    error!("Receiver loop ended: {}", e);
                    break;
                }
            },
            recv(full_refresh) -> _ => {
                info!("Periodic full refresh");
                provider.full_refresh();
            },
            recv(settings_poll) -> _ => if let Some(items) = watcher.poll() {
                provider.set_tracked(items);
                provider.full_refresh();
            },
            recv(peer_check) -> _ => if let Some(gone) = peers.check_timeout() {
                info!("Renderer {} timed out", gone);
                transport.set_peer(None)?;
            },
            recv(stop_rx) -> _ => break,
        }
    }

    shutdown.store(true, Ordering::SeqCst);
    if receiver.join().is_err() {
        error!("Receiver thread panicked");
    }
    info!("Provider stopped");
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
