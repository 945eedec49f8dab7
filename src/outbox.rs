//! Bounded outbound queue
//!
//! Sits between the router and a client's writer task. Pushing never
//! waits: when the queue is full the configured `OverflowPolicy` decides
//! between evicting the oldest frame and refusing the push, so one stalled
//! socket can never hold up the router.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tokio::sync::Notify;

use crate::config::OverflowPolicy;
use crate::error::SendError;

#[derive(Debug, Default)]
struct State {
    frames: VecDeque<Bytes>,
    closed: bool,
}

/// Single-consumer bounded frame queue
#[derive(Debug)]
pub struct Outbox {
    state: Mutex<State>,
    notify: Notify,
    capacity: usize,
    policy: OverflowPolicy,
}

impl Outbox {
    /// Create an outbox holding at most `capacity` frames (minimum 1)
    pub fn new(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            state: Mutex::new(State::default()),
            notify: Notify::new(),
            capacity: capacity.max(1),
            policy,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a frame for the writer
    ///
    /// Fails with `Closed` after `close`, and with `Overflow` when the queue
    /// is full under `OverflowPolicy::Disconnect`.
    pub fn push(&self, frame: Bytes) -> Result<(), SendError> {
        let mut state = self.lock();
        if state.closed {
            return Err(SendError::Closed);
        }
        if state.frames.len() >= self.capacity {
            match self.policy {
                OverflowPolicy::Disconnect => return Err(SendError::Overflow),
                OverflowPolicy::DropOldest => {
                    state.frames.pop_front();
                }
            }
        }
        state.frames.push_back(frame);
        drop(state);

        self.notify.notify_one();
        Ok(())
    }

    /// Wait for the next frame
    ///
    /// Returns `None` once the outbox is closed and drained.
    pub async fn recv(&self) -> Option<Bytes> {
        loop {
            {
                let mut state = self.lock();
                if let Some(frame) = state.frames.pop_front() {
                    return Some(frame);
                }
                if state.closed {
                    return None;
                }
            }
            self.notify.notified().await;
        }
    }

    /// Refuse further pushes and wake the consumer
    pub fn close(&self) {
        self.lock().closed = true;
        self.notify.notify_one();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of frames currently queued
    pub fn len(&self) -> usize {
        self.lock().frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
