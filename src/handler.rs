//! TCP connection handler
//!
//! Handles one accepted connection: spawns the reader pump, the writer pump
//! and the dispatcher, then waits for the connection's cancellation token
//! and tells the router the client is gone.

use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::client::Client;
use crate::config::RelayConfig;
use crate::dispatcher;
use crate::error::AppError;
use crate::outbox::Outbox;
use crate::router::RouterEvent;
use crate::types::ClientId;

/// Handle an accepted TCP connection for an already registered client
///
/// Returns once the connection is over and the deregistration has been
/// handed to the router.
pub async fn handle_connection(
    stream: TcpStream,
    client: Client,
    router_tx: mpsc::Sender<RouterEvent>,
    config: RelayConfig,
) -> Result<(), AppError> {
    let client_id = client.id;
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    debug!("Client {} attached to {}", client_id, peer_addr);

    let (read_half, write_half) = stream.into_split();

    // Reader -> dispatcher frame queue
    let (inbound_tx, inbound_rx) = mpsc::channel::<Bytes>(config.inbound_capacity.max(1));

    let read_task = tokio::spawn(read_pump(
        read_half,
        inbound_tx,
        client.cancel.clone(),
        client_id,
        config.read_buffer_size,
    ));
    let write_task = tokio::spawn(write_pump(
        write_half,
        Arc::clone(&client.outbox),
        client.cancel.clone(),
        client_id,
    ));
    let dispatch_task = tokio::spawn(dispatcher::run(
        client.clone(),
        inbound_rx,
        router_tx.clone(),
    ));

    // Either pump failing, or the router dropping us, ends the connection
    client.cancel.cancelled().await;

    router_tx
        .send(RouterEvent::Deregister { client_id })
        .await
        .map_err(|_| AppError::RouterClosed)?;

    join_task(read_task, "Read", client_id).await;
    join_task(write_task, "Write", client_id).await;
    join_task(dispatch_task, "Dispatch", client_id).await;

    info!("Client {} disconnected", client_id);
    Ok(())
}

/// Wait for a connection task, logging a panic or abort
///
/// Returns true if the task ran to completion.
async fn join_task(task: JoinHandle<()>, name: &str, client_id: ClientId) -> bool {
    match task.await {
        Ok(()) => true,
        Err(e) => {
            error!("{} task for {} failed: {}", name, client_id, e);
            false
        }
    }
}

/// Socket -> inbound queue
///
/// Each successful read becomes one frame holding exactly the bytes read,
/// undecoded.
async fn read_pump(
    mut reader: OwnedReadHalf,
    inbound: mpsc::Sender<Bytes>,
    cancel: CancellationToken,
    client_id: ClientId,
    buffer_size: usize,
) {
    let mut buffer = vec![0u8; buffer_size.max(1)];

    loop {
        let read = tokio::select! {
            _ = cancel.cancelled() => break,
            read = reader.read(&mut buffer) => read,
        };

        match read {
            Ok(0) => {
                debug!("Client {} closed the connection", client_id);
                break;
            }
            Ok(n) => {
                let frame = Bytes::copy_from_slice(&buffer[..n]);
                if inbound.send(frame).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!("Read error for {}: {}", client_id, e);
                break;
            }
        }
    }

    cancel.cancel();
    debug!("Read task ended for {}", client_id);
}

/// Outbox -> socket
async fn write_pump(
    mut writer: OwnedWriteHalf,
    outbox: Arc<Outbox>,
    cancel: CancellationToken,
    client_id: ClientId,
) {
    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => break,
            frame = outbox.recv() => match frame {
                Some(frame) => frame,
                None => break,
            },
        };

        if let Err(e) = writer.write_all(&frame).await {
            debug!("Write error for {}: {}", client_id, e);
            break;
        }
    }

    cancel.cancel();
    let _ = writer.shutdown().await;
    debug!("Write task ended for {}", client_id);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::net::TcpListener;

    use super::*;
    use crate::config::OverflowPolicy;

    async fn socket_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (connected, accepted) = tokio::join!(TcpStream::connect(addr), listener.accept());
        (connected.unwrap(), accepted.unwrap().0)
    }

    #[tokio::test]
    async fn test_frames_flow_both_ways() {
        let (mut remote, local) = socket_pair().await;
        let client = Client::new(ClientId(1), 8, OverflowPolicy::Disconnect);
        let (router_tx, mut events) = mpsc::channel(8);
        tokio::spawn(handle_connection(
            local,
            client.clone(),
            router_tx,
            RelayConfig::default(),
        ));

        remote.write_all(b"all:hello").await.unwrap();
        let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
            .await
            .unwrap()
            .unwrap();
        match event {
            RouterEvent::Route(message) => assert_eq!(message.text(), "hello"),
            other => panic!("Unexpected event: {:?}", other),
        }

        client.send(Bytes::from_static(b"1 : hello")).unwrap();
        let mut buf = [0u8; 9];
        tokio::time::timeout(Duration::from_secs(1), remote.read_exact(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&buf, b"1 : hello");
    }

    #[tokio::test]
    async fn test_join_task_reports_panics() {
        let clean = tokio::spawn(async {});
        assert!(join_task(clean, "Read", ClientId(1)).await);

        let panicked = tokio::spawn(async { panic!("pump blew up") });
        assert!(!join_task(panicked, "Write", ClientId(1)).await);
    }

    #[tokio::test]
    async fn test_hangup_deregisters() {
        let (remote, local) = socket_pair().await;
        let client = Client::new(ClientId(3), 8, OverflowPolicy::Disconnect);
        let (router_tx, mut events) = mpsc::channel(8);
        let handler = tokio::spawn(handle_connection(
            local,
            client.clone(),
            router_tx,
            RelayConfig::default(),
        ));

        drop(remote);

        let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            event,
            RouterEvent::Deregister {
                client_id: ClientId(3)
            }
        ));
        assert!(!client.is_connected());

        let result = tokio::time::timeout(Duration::from_secs(1), handler)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_router_disconnect_closes_socket() {
        let (mut remote, local) = socket_pair().await;
        let client = Client::new(ClientId(2), 8, OverflowPolicy::Disconnect);
        let (router_tx, _events) = mpsc::channel(8);
        tokio::spawn(handle_connection(
            local,
            client.clone(),
            router_tx,
            RelayConfig::default(),
        ));

        client.disconnect();

        let mut buf = [0u8; 16];
        let read = tokio::time::timeout(Duration::from_secs(1), remote.read(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(read, 0);
    }
}
