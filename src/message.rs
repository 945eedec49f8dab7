//! Routed chat message
//!
//! A `Message` is built once by a dispatcher and consumed once by the
//! router. A missing receiver means broadcast. The text is kept as raw
//! bytes so whatever a client sent is relayed unchanged.

use bytes::{BufMut, Bytes, BytesMut};

use crate::types::ClientId;

/// One routing request from a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    sender: ClientId,
    receiver: Option<ClientId>,
    text: Bytes,
}

impl Message {
    /// A message for every live client
    pub fn broadcast(sender: ClientId, text: impl Into<Bytes>) -> Self {
        Self {
            sender,
            receiver: None,
            text: text.into(),
        }
    }

    /// A message for a single client
    pub fn personal(sender: ClientId, receiver: ClientId, text: impl Into<Bytes>) -> Self {
        Self {
            sender,
            receiver: Some(receiver),
            text: text.into(),
        }
    }

    pub fn sender(&self) -> ClientId {
        self.sender
    }

    pub fn receiver(&self) -> Option<ClientId> {
        self.receiver
    }

    pub fn text(&self) -> &Bytes {
        &self.text
    }

    /// Wire form delivered to recipients: `"<sender_id> : <text>"`
    pub fn render(&self) -> Bytes {
        let prefix = format!("{} : ", self.sender);
        let mut frame = BytesMut::with_capacity(prefix.len() + self.text.len());
        frame.put_slice(prefix.as_bytes());
        frame.put_slice(&self.text);
        frame.freeze()
    }
}
