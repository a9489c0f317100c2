//! Coinboard renderer — a UDP client that asks the provider for quotes and keeps a
//! fixed board of up to twenty slots current.
//!
//! On start it sends `init`, keeps the connection alive with periodic `ping`s and handles
//! incoming results on a single event loop. Full batches are rendered once complete;
//! stale slots are then refreshed one by one.
//!
//! Usage example (CLI):
//! ```bash
//! coinboard_renderer --provider-ip 192.168.0.10 --provider-port 8081
//! ```
#![warn(missing_docs)]
mod args;

use crate::args::Args;
use clap::Parser;
use coinboard_common::net::{PING_INTERVAL, REFRESH_STAGGER, addr};
use coinboard_common::transport::UdpTransport;
use coinboard_common::{CoinboardError, Result};
use coinboard_renderer::renderer::{Handled, Renderer};
use coinboard_renderer::scheduler::RefreshScheduler;
use coinboard_renderer::sender::RequestSender;
use crossbeam_channel::{bounded, select, unbounded};
use log::{debug, error, info};
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn main() -> Result<(), CoinboardError> {
    init_logger();
    let args = Args::parse();

    let shutdown = Arc::new(AtomicBool::new(false));
    let (stop_tx, stop_rx) = bounded::<()>(1);
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down renderer...");
            shutdown.store(true, Ordering::SeqCst);
            let _ = stop_tx.try_send(());
        })
        .map_err(|e| CoinboardError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;
    }

    let provider_addr = resolve_provider(&args.provider_ip, args.provider_port)?;
    let transport = Arc::new(UdpTransport::bind(&addr("0.0.0.0", args.listen_port))?);
    transport.set_peer(Some(provider_addr))?;
    info!("Renderer listening on {}; provider at {}", transport.local_addr()?, provider_addr);

    let (msg_tx, msg_rx) = unbounded();
    let receiver = transport.spawn_receiver(msg_tx, Arc::clone(&shutdown));
    let pinger = RequestSender::start_ping_thread(transport.clone(), PING_INTERVAL, Arc::clone(&shutdown));

    let scheduler = RefreshScheduler::new(transport.clone(), REFRESH_STAGGER);
    let mut renderer = Renderer::new(scheduler, args.duplicates);
    info!("Duplicate policy: {}", args.duplicates);
    print_board(&renderer);

    RequestSender::send_init(transport.as_ref())?;

    loop {
        select! {
            recv(msg_rx) -> msg => match msg {
                Ok((_, from)) if from != provider_addr => {
                    debug!("Ignoring datagram from unknown sender {}", from);
                }
                Ok((message, _)) => {
                    match renderer.handle(message) {
                        Handled::Rendered { .. } | Handled::Patched { changed: true, .. } => {
                            print_board(&renderer);
                        }
                        Handled::Buffered { current, total } => {
                            debug!("Batch progress: {}/{}", current, total);
                        }
                        Handled::Patched { changed: false, .. } | Handled::Ignored => {}
                    }
                }
                Err(e) => {
                    error!("Receiver loop ended: {}", e);
                    break;
                }
            },
            recv(stop_rx) -> _ => break,
        }
    }

    shutdown.store(true, Ordering::SeqCst);
    for handle in [receiver, pinger] {
        if handle.join().is_err() {
            error!("Background thread panicked");
        }
    }
    info!("Renderer stopped");
    Ok(())
}

fn resolve_provider(ip: &str, port: u16) -> Result<SocketAddr> {
    let ip = ip.trim().replace('"', "");
    (ip.as_str(), port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| CoinboardError::Format(format!("Cannot resolve provider address {}", ip)))
}

fn print_board(renderer: &Renderer) {
    for line in renderer.board().render_lines() {
        info!("{}", line);
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
