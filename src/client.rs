//! Client struct definition
//!
//! Represents an accepted connection as seen by the rest of the relay:
//! its id, its outbound queue and its cancellation token. The socket itself
//! is owned by the connection handler's pumps.

use std::sync::Arc;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::config::OverflowPolicy;
use crate::error::SendError;
use crate::outbox::Outbox;
use crate::types::ClientId;

/// Connected client handle
///
/// Cheap to clone: the router keeps one copy in its registry, the
/// connection handler keeps another for the writer and dispatcher.
#[derive(Debug, Clone)]
pub struct Client {
    /// Unique identifier for this client
    pub id: ClientId,
    /// Relay → Client frame queue
    pub outbox: Arc<Outbox>,
    /// Fires when either pump fails or the router disconnects the client
    pub cancel: CancellationToken,
}

impl Client {
    /// Create a new client with a fresh outbox and cancellation token
    pub fn new(id: ClientId, outbound_capacity: usize, overflow: OverflowPolicy) -> Self {
        Self {
            id,
            outbox: Arc::new(Outbox::new(outbound_capacity, overflow)),
            cancel: CancellationToken::new(),
        }
    }

    /// Queue a frame for this client's writer
    pub fn send(&self, frame: Bytes) -> Result<(), SendError> {
        self.outbox.push(frame)
    }

    /// Answer a `whoami` request with `"<id>\n"`
    pub fn who_am_i(&self) -> Result<(), SendError> {
        self.send(Bytes::from(format!("{}\n", self.id)))
    }

    /// Close the outbox and cancel the connection
    pub fn disconnect(&self) {
        self.outbox.close();
        self.cancel.cancel();
    }

    pub fn is_connected(&self) -> bool {
        !self.cancel.is_cancelled()
    }
}
