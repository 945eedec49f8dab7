//! Multi-client TCP Chat Relay Library
//!
//! Clients connect over TCP, send raw text frames and receive broadcast or
//! point-to-point messages relayed through a single router actor.
//!
//! # Protocol
//! - `whoami` → `"<id>\n"`
//! - `<id>:<text>` → `"<sender> : <text>"` delivered to client `<id>`
//! - `all:<text>` → `"<sender> : <text>"` delivered to every client
//! - anything else → `"<sender> : <frame>"` delivered to every client
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `Router` is the only owner of the client registry
//! - Each connection runs a reader pump, a writer pump and a dispatcher
//! - Ids come from a single-slot allocator the router refills after each
//!   registration, so they are sequential in arrival order
//! - No locks around shared state - all registry access goes through
//!   message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use chat_relay::{serve, RelayConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:4000").await.unwrap();
//!     serve(listener, RelayConfig::default()).await.unwrap();
//! }
//! ```

pub mod allocator;
pub mod cli;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod message;
pub mod outbox;
pub mod protocol;
pub mod registry;
pub mod router;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use allocator::{id_slot, IdAllocator, IdReplenisher};
pub use client::Client;
pub use config::{OverflowPolicy, RelayConfig};
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use message::Message;
pub use outbox::Outbox;
pub use protocol::{parse_frame, Command};
pub use registry::Registry;
pub use router::{Router, RouterEvent};
pub use server::serve;
pub use types::ClientId;
