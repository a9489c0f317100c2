//!
//! Common types and utilities shared by the coinboard provider and renderer.
//!
//! This crate aggregates:
//! - `error` — unified error type `CoinboardError` used across the workspace.
//! - `result` — handy `Result<T, CoinboardError>` alias.
//! - `quote` — the `Quote` value delivered to display slots.
//! - `update` — slot bindings and per-slot update results.
//! - `message` — wire messages exchanged between provider and renderer.
//! - `transport` — the channel abstraction plus UDP and in-process implementations.
//! - `net` — networking and protocol constants.
#![warn(missing_docs)]
pub mod error;
pub mod message;
pub mod net;
pub mod quote;
pub mod result;
pub mod transport;
pub mod update;

pub use error::CoinboardError;
pub use message::Message;
pub use quote::Quote;
pub use result::Result;
pub use transport::Transport;
pub use update::{EventKind, Status, TrackedItem, UpdateResult};
