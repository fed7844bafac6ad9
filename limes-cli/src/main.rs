//! limesctl - command-line client for Limes
//!
//! Shows quota, usage and capacity reports of an OpenStack cloud and
//! changes project quotas, talking to Limes (and its LIQUIDs) with a
//! Keystone token.

use clap::Parser;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod context;
mod lookup;

use cli::Cli;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Setup logging: RUST_LOG wins over --debug
    let default_level = if cli.debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute the command
    let result =
        commands::dispatch(cli.command, &cli.auth, Duration::from_secs(cli.timeout)).await;

    // Handle errors
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
