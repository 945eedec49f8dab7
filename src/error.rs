//! Error types for the chat relay
//!
//! Defines application-level errors and outbox send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// All of these are fatal for the component that hits them: the accept loop
/// stops on any of them, a connection handler closes its connection.
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error (listener or socket)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The router actor is gone and can no longer take events
    #[error("Router closed")]
    RouterClosed,

    /// The id slot was dropped by the router
    #[error("Id allocator closed")]
    AllocatorClosed,
}

/// Outbox send errors
///
/// Occurs when a frame cannot be queued for a client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    /// The outbox has been closed (client deregistered)
    #[error("Outbox closed")]
    Closed,

    /// The outbox is full and the overflow policy is to disconnect
    #[error("Outbox full")]
    Overflow,
}
