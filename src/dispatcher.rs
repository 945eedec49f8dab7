//! Per-connection protocol dispatcher
//!
//! Drains a client's inbound frames, classifies them with
//! [`parse_frame`](crate::protocol::parse_frame) and turns them into router
//! events. `whoami` is answered locally on the client's own outbox.

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::debug;

use crate::client::Client;
use crate::message::Message;
use crate::protocol::{parse_frame, Command};
use crate::router::RouterEvent;
use crate::types::ClientId;

/// Run the dispatcher until the reader hangs up or the router goes away
pub async fn run(
    client: Client,
    mut inbound: mpsc::Receiver<Bytes>,
    router: mpsc::Sender<RouterEvent>,
) {
    while let Some(frame) = inbound.recv().await {
        let Some(command) = parse_frame(&frame) else {
            debug!("Skipping frame with unparseable receiver from {}", client.id);
            continue;
        };

        if command == Command::WhoAmI {
            if let Err(e) = client.who_am_i() {
                debug!("Could not answer whoami for {}: {}", client.id, e);
                client.cancel.cancel();
            }
            continue;
        }

        let Some(event) = command_to_event(client.id, command) else {
            continue;
        };
        if router.send(event).await.is_err() {
            debug!("Router closed, ending dispatcher for {}", client.id);
            break;
        }
    }
    debug!("Dispatcher ended for {}", client.id);
}

/// Convert a routed Command to a RouterEvent
fn command_to_event(sender: ClientId, command: Command) -> Option<RouterEvent> {
    match command {
        Command::WhoAmI => None,
        Command::Personal { receiver, text } => Some(RouterEvent::Route(Message::personal(
            sender, receiver, text,
        ))),
        Command::Broadcast { text } => Some(RouterEvent::Route(Message::broadcast(sender, text))),
    }
}
