//! Router actor implementation
//!
//! The single owner of the client registry. Registrations, deregistrations,
//! broadcasts and personal messages all arrive on one channel and are
//! handled one at a time, so every registry change and every delivery is
//! totally ordered.

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::allocator::IdReplenisher;
use crate::client::Client;
use crate::error::SendError;
use crate::message::Message;
use crate::registry::Registry;
use crate::types::ClientId;

/// Events sent from the accept loop and connection handlers to the router
#[derive(Debug)]
pub enum RouterEvent {
    /// New client accepted
    Register { client: Client },
    /// Client connection ended
    Deregister { client_id: ClientId },
    /// Broadcast (no receiver) or personal message
    Route(Message),
}

/// The router actor
pub struct Router {
    /// Every client ever registered
    registry: Registry,
    /// Refills the accept loop's id slot
    ids: IdReplenisher,
    /// Event receiver channel
    receiver: mpsc::Receiver<RouterEvent>,
}

impl Router {
    /// Create a new router with the given event receiver and id slot
    pub fn new(receiver: mpsc::Receiver<RouterEvent>, ids: IdReplenisher) -> Self {
        Self {
            registry: Registry::new(),
            ids,
            receiver,
        }
    }

    /// Run the router event loop
    ///
    /// Continuously receives and processes events until all senders are dropped.
    pub async fn run(mut self) {
        info!("Router started");

        while let Some(event) = self.receiver.recv().await {
            self.handle_event(event);
        }

        info!("Router shutting down");
    }

    /// Process a single event
    fn handle_event(&mut self, event: RouterEvent) {
        match event {
            RouterEvent::Register { client } => self.handle_register(client),
            RouterEvent::Deregister { client_id } => self.handle_deregister(client_id),
            RouterEvent::Route(message) => match message.receiver() {
                Some(receiver) => self.handle_personal(receiver, &message),
                None => self.handle_broadcast(&message),
            },
        }
    }

    fn handle_register(&mut self, client: Client) {
        let client_id = client.id;
        if self.registry.insert(client) {
            info!("Client {} registered", client_id);
        } else {
            warn!("Client {} already registered, ignoring", client_id);
        }

        // The accept loop waits on the slot, so it is refilled either way
        self.ids.replenish(self.registry.next_id());
        debug!(
            "Registered: {}, live: {}",
            self.registry.len(),
            self.registry.live_count()
        );
    }

    fn handle_deregister(&mut self, client_id: ClientId) {
        let Some(client) = self.registry.tombstone(client_id) else {
            return;
        };
        client.disconnect();
        info!("Client {} deregistered", client_id);
    }

    /// Deliver to every live client, the sender included
    fn handle_broadcast(&mut self, message: &Message) {
        let frame = message.render();
        debug!(
            "Broadcast from {} to {} clients",
            message.sender(),
            self.registry.live_count()
        );

        for client_id in self.registry.live_ids() {
            self.deliver(client_id, frame.clone());
        }
    }

    fn handle_personal(&mut self, receiver: ClientId, message: &Message) {
        if self.registry.get_live(receiver).is_none() {
            debug!(
                "Dropping message from {} to unknown or gone client {}",
                message.sender(),
                receiver
            );
            return;
        }
        debug!("Personal message {} -> {}", message.sender(), receiver);
        self.deliver(receiver, message.render());
    }

    /// Helper: queue a frame, disconnecting the client if its outbox refuses it
    fn deliver(&mut self, client_id: ClientId, frame: Bytes) {
        let Some(client) = self.registry.get_live(client_id) else {
            return;
        };

        let sent = client.send(frame);
        match sent {
            Ok(()) => {}
            Err(SendError::Overflow) => {
                warn!("Client {} outbox full, disconnecting", client_id);
                self.handle_deregister(client_id);
            }
            Err(SendError::Closed) => {
                self.handle_deregister(client_id);
            }
        }
    }
}
