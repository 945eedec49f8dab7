//! Chat Relay - Entry Point
//!
//! Parses the port, binds the loopback listener and runs the relay.

use std::net::Ipv4Addr;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chat_relay::cli::Cli;
use chat_relay::{serve, RelayConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=chat_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chat_relay=info")),
        )
        .init();

    let config = RelayConfig::from(Cli::parse());

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, config.port)).await?;
    info!("Chat relay listening on {}", listener.local_addr()?);

    if let Err(e) = serve(listener, config).await {
        error!("Relay stopped: {}", e);
        return Err(e.into());
    }
    Ok(())
}
