//! Channel transport between provider and renderer.
//!
//! The [`Transport`] trait is the only thing the protocol components know about the
//! channel: whether it is open right now, and how to push one message through it. Sends
//! are atomic per message but carry no ordering or delivery guarantee.
//!
//! Two implementations are provided:
//! - [`UdpTransport`] — JSON datagrams over a UDP socket. The transport is open while a
//!   peer address is known.
//! - [`ChannelTransport`] — in-process crossbeam channel, used to wire components
//!   together without sockets.
use std::net::{SocketAddr, UdpSocket};
use std::io::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, error, info};

use crate::error::CoinboardError;
use crate::message::Message;
use crate::net::MAX_DATAGRAM;
use crate::result::Result;

/// How long a blocked `recv_from` waits before re-checking the shutdown flag.
const RECV_TIMEOUT: Duration = Duration::from_secs(1);

/// Message-oriented duplex channel.
pub trait Transport: Send + Sync {
    /// Whether a send attempted now can reach the peer.
    fn is_open(&self) -> bool;

    /// Sends one message. Fails with [`CoinboardError::ChannelNotReady`] when closed.
    fn send(&self, message: &Message) -> Result<()>;
}

/// UDP transport carrying one JSON-encoded [`Message`] per datagram.
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
    peer: Mutex<Option<SocketAddr>>,
}

impl UdpTransport {
    /// Bind a new UDP socket on `bind_addr` (e.g., `0.0.0.0:8081`). No peer is known yet.
    pub fn bind(bind_addr: &str) -> Result<Self> {
        let socket = UdpSocket::bind(bind_addr)?;
        socket.set_read_timeout(Some(RECV_TIMEOUT))?;
        info!("UDP socket created on: {}", socket.local_addr()?);
        Ok(Self {
            socket: Arc::new(socket),
            peer: Mutex::new(None),
        })
    }

    /// Local address of the underlying socket.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Sets or clears the peer. Clearing it closes the transport.
    pub fn set_peer(&self, peer: Option<SocketAddr>) -> Result<()> {
        let mut current = self.peer.lock()?;
        if *current != peer {
            match peer {
                Some(addr) => info!("Peer set to {}", addr),
                None => info!("Peer cleared; channel closed"),
            }
        }
        *current = peer;
        Ok(())
    }

    /// Current peer address, if any.
    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer.lock().ok().and_then(|peer| *peer)
    }

    /// Spawn a background thread that decodes incoming datagrams and forwards them to `tx`
    /// together with the sender address.
    ///
    /// Malformed datagrams are dropped. The thread exits when `shutdown` is set, when `tx`
    /// is disconnected, or on a non-timeout socket error.
    pub fn spawn_receiver(
        &self,
        tx: Sender<(Message, SocketAddr)>,
        shutdown: Arc<AtomicBool>,
    ) -> JoinHandle<()> {
        let socket = Arc::clone(&self.socket);
        thread::spawn(move || {
            let mut buf = [0u8; MAX_DATAGRAM];
            while !shutdown.load(Ordering::Relaxed) {
                match socket.recv_from(&mut buf) {
                    Ok((size, addr)) => match Message::from_json_bytes(&buf[..size]) {
                        Ok(message) => {
                            debug!("Received {} from {}", message.kind_name(), addr);
                            if tx.send((message, addr)).is_err() {
                                break;
                            }
                        }
                        Err(e) => debug!("Ignoring datagram from {}: {}", addr, e),
                    },
                    Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                        continue;
                    }
                    // Windows reports ICMP port unreachable on the next recv.
                    Err(e) if e.kind() == ErrorKind::ConnectionReset => continue,
                    Err(e) => {
                        error!("Receive data error: {}", e);
                        break;
                    }
                }
            }
            info!("Receiver loop stopping...");
        })
    }
}

impl Transport for UdpTransport {
    fn is_open(&self) -> bool {
        self.peer().is_some()
    }

    fn send(&self, message: &Message) -> Result<()> {
        let peer = self
            .peer()
            .ok_or_else(|| CoinboardError::ChannelNotReady(message.kind_name().to_string()))?;
        let bytes = message.to_json_bytes()?;
        self.socket.send_to(&bytes, peer)?;
        Ok(())
    }
}

/// In-process transport backed by an unbounded crossbeam channel.
pub struct ChannelTransport {
    tx: Sender<Message>,
    open: AtomicBool,
}

impl ChannelTransport {
    /// Creates an open transport and the receiving end of its channel.
    pub fn new() -> (Self, Receiver<Message>) {
        let (tx, rx) = unbounded();
        (
            Self {
                tx,
                open: AtomicBool::new(true),
            },
            rx,
        )
    }

    /// Opens or closes the transport.
    pub fn set_open(&self, open: bool) {
        self.open.store(open, Ordering::SeqCst);
    }
}

impl Transport for ChannelTransport {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn send(&self, message: &Message) -> Result<()> {
        if !self.is_open() {
            return Err(CoinboardError::ChannelNotReady(message.kind_name().to_string()));
        }
        self.tx
            .send(message.clone())
            .map_err(|e| CoinboardError::ChannelSend(e.to_string()))
    }
}
