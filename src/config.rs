//! Relay configuration
//!
//! Tuning knobs for the relay. The CLI fills these in; tests build them
//! directly with struct update syntax over `RelayConfig::default()`.

use clap::ValueEnum;

/// Default per-client outbound queue capacity (frames)
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 64;

/// Default size of the socket read buffer (bytes)
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// Default per-client inbound queue capacity (frames)
pub const DEFAULT_INBOUND_CAPACITY: usize = 32;

/// Default router event queue capacity
pub const DEFAULT_ROUTER_CAPACITY: usize = 256;

/// What to do when a client's outbox is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OverflowPolicy {
    /// Deregister the client and close its connection
    #[default]
    Disconnect,
    /// Discard the oldest queued frame to make room
    DropOldest,
}

/// Runtime configuration for the relay
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Port to bind on the loopback interface (0 picks an ephemeral port)
    pub port: u16,
    /// Maximum frames queued per client before the overflow policy applies
    pub outbound_capacity: usize,
    /// Overflow policy for outbound queues
    pub overflow: OverflowPolicy,
    /// Read buffer size; one read produces at most one frame of this size
    pub read_buffer_size: usize,
    /// Frames buffered between a reader and its dispatcher
    pub inbound_capacity: usize,
    /// Events buffered in front of the router
    pub router_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: 0,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
            overflow: OverflowPolicy::default(),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            inbound_capacity: DEFAULT_INBOUND_CAPACITY,
            router_capacity: DEFAULT_ROUTER_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RelayConfig::default();
        assert_eq!(config.outbound_capacity, 64);
        assert_eq!(config.read_buffer_size, 1024);
        assert_eq!(config.overflow, OverflowPolicy::Disconnect);
    }

    #[test]
    fn test_overflow_policy_names() {
        assert_eq!(
            OverflowPolicy::from_str("drop-oldest", false).unwrap(),
            OverflowPolicy::DropOldest
        );
        assert_eq!(
            OverflowPolicy::from_str("disconnect", false).unwrap(),
            OverflowPolicy::Disconnect
        );
    }
}
