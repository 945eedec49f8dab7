//! Relay accept loop
//!
//! Wires the pieces together: starts the router actor, then for every
//! accepted connection takes the next id from the slot, registers the
//! client and spawns its connection handler.

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::allocator::id_slot;
use crate::client::Client;
use crate::config::RelayConfig;
use crate::error::AppError;
use crate::handler::handle_connection;
use crate::router::{Router, RouterEvent};

/// Serve clients on an already bound listener
///
/// Only returns on failure; an accept error is fatal.
pub async fn serve(listener: TcpListener, config: RelayConfig) -> Result<(), AppError> {
    let (router_tx, router_rx) = mpsc::channel(config.router_capacity.max(1));
    let (mut ids, replenisher) = id_slot();

    tokio::spawn(Router::new(router_rx, replenisher).run());
    info!("Router actor started");

    loop {
        let (stream, addr) = listener.accept().await.inspect_err(|e| {
            error!("Failed to accept connection: {}", e);
        })?;

        let client_id = ids.next().await?;
        info!("New connection from {}, id {}", addr, client_id);

        let client = Client::new(client_id, config.outbound_capacity, config.overflow);

        // Registration is queued before the handler exists, so it precedes
        // every event this client can produce.
        router_tx
            .send(RouterEvent::Register {
                client: client.clone(),
            })
            .await
            .map_err(|_| AppError::RouterClosed)?;

        let router_tx = router_tx.clone();
        let config = config.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, client, router_tx, config).await {
                error!("Connection handler error for {}: {}", client_id, e);
            }
        });
    }
}
