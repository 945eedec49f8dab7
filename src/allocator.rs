//! Sequential client id allocation
//!
//! A single-slot cell: the accept loop takes the next id out of it and the
//! router refills it right after registering the client that used the
//! previous one. Taking from an empty slot waits, so ids are handed out
//! strictly one at a time and in registration order.

use tokio::sync::mpsc;
use tracing::warn;

use crate::error::AppError;
use crate::types::ClientId;

/// Consumer half, owned by the accept loop
#[derive(Debug)]
pub struct IdAllocator {
    slot: mpsc::Receiver<ClientId>,
}

/// Producer half, owned by the router
#[derive(Debug, Clone)]
pub struct IdReplenisher {
    slot: mpsc::Sender<ClientId>,
}

/// Create an id slot seeded with `ClientId::FIRST`
pub fn id_slot() -> (IdAllocator, IdReplenisher) {
    let (tx, rx) = mpsc::channel(1);
    let seeded = tx.try_send(ClientId::FIRST);
    debug_assert!(seeded.is_ok(), "fresh id slot must accept the seed");
    (IdAllocator { slot: rx }, IdReplenisher { slot: tx })
}

impl IdAllocator {
    /// Take the next id, waiting until the router has replenished the slot
    pub async fn next(&mut self) -> Result<ClientId, AppError> {
        self.slot.recv().await.ok_or(AppError::AllocatorClosed)
    }
}

impl IdReplenisher {
    /// Put the next id into the slot
    pub fn replenish(&self, next: ClientId) {
        match self.slot.try_send(next) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(stale)) => {
                warn!("Id slot still holds {}, dropping {}", stale, next);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                // Accept loop is gone; nobody needs more ids.
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_slot_starts_at_one() {
        let (mut allocator, _replenisher) = id_slot();
        assert_eq!(allocator.next().await.unwrap(), ClientId(1));
    }

    #[tokio::test]
    async fn test_next_waits_for_replenish() {
        let (mut allocator, replenisher) = id_slot();
        allocator.next().await.unwrap();

        let pending = tokio::time::timeout(Duration::from_millis(50), allocator.next()).await;
        assert!(pending.is_err(), "empty slot must not yield an id");

        replenisher.replenish(ClientId(2));
        assert_eq!(allocator.next().await.unwrap(), ClientId(2));
    }

    #[tokio::test]
    async fn test_allocator_closed_when_router_gone() {
        let (mut allocator, replenisher) = id_slot();
        allocator.next().await.unwrap();
        drop(replenisher);

        assert!(matches!(
            allocator.next().await,
            Err(AppError::AllocatorClosed)
        ));
    }
}
