//! Command-line arguments for the provider.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::path::PathBuf;

use clap::Parser;
use coinboard_common::net::{FULL_REFRESH_INTERVAL, PROVIDER_PORT};

use coinboard_provider::fetcher::coincap::DEFAULT_BASE_URL;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// UDP port to listen on for renderer messages.
    #[clap(long, default_value_t = PROVIDER_PORT)]
    pub port: u16,

    /// JSON settings file with the tracked list, e.g. `[{"name":"BTC"}]`.
    #[clap(long, default_value = "coins.json")]
    pub settings: PathBuf,

    /// JSON file backing the quote cache.
    #[clap(long, default_value = "quote_cache.json")]
    pub cache: PathBuf,

    /// Base URL of the CoinCap API.
    #[clap(long, default_value = DEFAULT_BASE_URL)]
    pub api_base: String,

    /// Seconds between periodic full refreshes.
    #[clap(long, default_value_t = FULL_REFRESH_INTERVAL.as_secs())]
    pub refresh_interval_secs: u64,

    /// Serve simulated quotes instead of calling the remote API.
    #[clap(long)]
    pub offline: bool,
}
