//! Fan-out of server messages to connected sessions

use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::ws::protocol::ServerMsg;

/// Per-connection outbound channel capacity
pub const OUTBOUND_CAPACITY: usize = 256;

/// Outbound half of a websocket session
pub type ConnectionSender = mpsc::Sender<ServerMsg>;

/// Each recipient has its own ordered channel; a full or closed channel
/// drops the message for that recipient only.
#[derive(Default)]
pub struct Broadcaster {
    connections: HashMap<Uuid, ConnectionSender>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: Uuid, sender: ConnectionSender) {
        self.connections.insert(id, sender);
    }

    pub fn unregister(&mut self, id: &Uuid) {
        self.connections.remove(id);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn send_to(&self, id: &Uuid, msg: ServerMsg) {
        if let Some(sender) = self.connections.get(id) {
            deliver(id, sender, msg);
        }
    }

    pub fn broadcast(&self, msg: &ServerMsg) {
        for (id, sender) in &self.connections {
            deliver(id, sender, msg.clone());
        }
    }
}

fn deliver(id: &Uuid, sender: &ConnectionSender, msg: ServerMsg) {
    if sender.try_send(msg).is_err() {
        debug!(
            connection_id = %id,
            "Skipping message to slow or closed connection"
        );
    }
}
