//! Result type alias shared across the workspace.
//!
//! This module defines a convenient alias that defaults the error type to the
//! common `CoinboardError`, so functions can simply return `Result<T>`.
use crate::error::CoinboardError;

/// Workspace-wide `Result` alias with `CoinboardError` as the default error.
pub type Result<T, E = CoinboardError> = std::result::Result<T, E>;
