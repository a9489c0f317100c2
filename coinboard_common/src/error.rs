//! Error types shared between provider and renderer.
//!
//! The `CoinboardError` enum unifies common failure cases for I/O, serialization,
//! channel communication, remote fetches and internal logic, allowing crates to
//! propagate a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by provider and renderer.
#[derive(Error, Debug)]
pub enum CoinboardError {
    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The transport was not open when a send was attempted. The message is dropped.
    #[error("Channel not ready: {0}")]
    ChannelNotReady(String),

    /// A datagram could not be decoded into a known message type.
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// Remote quote fetch failed; contains the item id and the cause.
    #[error("Fetch failed for {id}: {reason}")]
    Fetch {
        /// Item id that was being fetched.
        id: String,
        /// Human-readable cause.
        reason: String,
    },

    /// Crossbeam/channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for CoinboardError {
    fn from(err: PoisonError<T>) -> Self {
        CoinboardError::MutexLock(err.to_string())
    }
}

impl CoinboardError {
    /// Shorthand for building a [`CoinboardError::Fetch`].
    pub fn fetch(id: &str, reason: impl ToString) -> Self {
        CoinboardError::Fetch {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }
}
