use clap::Parser;

use crate::config::{
    OverflowPolicy, RelayConfig, DEFAULT_INBOUND_CAPACITY, DEFAULT_OUTBOUND_CAPACITY,
    DEFAULT_READ_BUFFER_SIZE, DEFAULT_ROUTER_CAPACITY,
};

/// Multi-client TCP chat relay bound to 127.0.0.1.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Port to listen on.
    pub port: u16,

    /// Frames queued per client before the overflow policy applies.
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_CAPACITY)]
    pub outbound_capacity: usize,

    /// What to do with a client whose outbound queue is full.
    #[arg(long, value_enum, default_value_t = OverflowPolicy::Disconnect)]
    pub overflow: OverflowPolicy,

    /// Socket read buffer size in bytes.
    #[arg(long = "read-buffer", default_value_t = DEFAULT_READ_BUFFER_SIZE)]
    pub read_buffer_size: usize,

    /// Frames buffered between a connection's reader and its dispatcher.
    #[arg(long, default_value_t = DEFAULT_INBOUND_CAPACITY)]
    pub inbound_capacity: usize,

    /// Events buffered in front of the router.
    #[arg(long, default_value_t = DEFAULT_ROUTER_CAPACITY)]
    pub router_capacity: usize,
}

impl From<Cli> for RelayConfig {
    fn from(cli: Cli) -> Self {
        Self {
            port: cli.port,
            outbound_capacity: cli.outbound_capacity,
            overflow: cli.overflow,
            read_buffer_size: cli.read_buffer_size,
            inbound_capacity: cli.inbound_capacity,
            router_capacity: cli.router_capacity,
        }
    }
}
