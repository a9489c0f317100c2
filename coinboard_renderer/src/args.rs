//! Command-line arguments for the renderer.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use coinboard_common::net::PROVIDER_PORT;
use coinboard_renderer::barrier::DuplicatePolicy;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Provider IP address (IPv4 or IPv6).
    #[clap(long, default_value = "127.0.0.1")]
    pub provider_ip: String,

    /// Provider UDP port.
    #[clap(long, default_value_t = PROVIDER_PORT)]
    pub provider_port: u16,

    /// Local UDP port to bind; 0 picks a free port.
    #[clap(long, default_value_t = 0)]
    pub listen_port: u16,

    /// How duplicate slot indices count toward batch completion.
    #[clap(long, value_enum, default_value_t = DuplicatePolicy::CountEvery)]
    pub duplicates: DuplicatePolicy,
}
