use std::{fmt, future::Future};

use indexmap::IndexMap;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dao::storage::StorageError,
    dto::ws::{DisplayMessage, Snapshot},
};

/// Identity of one attached display, used only for fan-out bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.simple(), f)
    }
}

/// Outbound half of a display connection: serialized text frames, drained by
/// the socket writer task.
pub type FrameSender = mpsc::UnboundedSender<String>;

/// Reasons a display could not be attached.
#[derive(Debug, Error)]
pub enum AttachError {
    /// One of the content store getters failed while assembling the snapshot.
    #[error("failed to assemble snapshot")]
    Snapshot(#[from] StorageError),
    /// The snapshot could not be encoded.
    #[error("failed to encode snapshot")]
    Encode(#[from] serde_json::Error),
    /// The connection's writer went away before the snapshot could be queued.
    #[error("connection closed before snapshot delivery")]
    ConnectionClosed,
}

/// Fan-out hub owning the set of live display connections.
///
/// `attach`, `detach` and the live-set copy taken by `publish` are serialized
/// by one lock. Frames are pushed to per-connection unbounded queues outside
/// that lock, so a stalled socket never holds up the others.
pub struct DisplayHub {
    connections: Mutex<IndexMap<ConnectionId, FrameSender>>,
    fanout_gate: Mutex<()>,
}

impl DisplayHub {
    /// Create a hub with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(IndexMap::new()),
            fanout_gate: Mutex::new(()),
        }
    }

    /// Register a connection and queue its snapshot as the first frame.
    ///
    /// The connection lock is held while `snapshot` resolves, so a mutation
    /// published after the snapshot was read is guaranteed to reach this
    /// connection. On failure nothing is registered and the caller should
    /// close the transport.
    pub async fn attach<F>(&self, tx: FrameSender, snapshot: F) -> Result<ConnectionId, AttachError>
    where
        F: Future<Output = Result<Snapshot, StorageError>>,
    {
        let mut connections = self.connections.lock().await;
        let snapshot = snapshot.await?;
        let frame = DisplayMessage::Init(snapshot).to_json()?;
        tx.send(frame).map_err(|_| AttachError::ConnectionClosed)?;

        let id = ConnectionId::new();
        connections.insert(id, tx);
        info!(connection = %id, live = connections.len(), "display attached");
        Ok(id)
    }

    /// Remove a connection from the live set. Returns whether it was present.
    pub async fn detach(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.lock().await;
        let removed = connections.shift_remove(&id).is_some();
        if removed {
            info!(connection = %id, live = connections.len(), "display detached");
        }
        removed
    }

    /// Send `message` to every live connection, returning how many accepted it.
    ///
    /// Publishers are totally ordered by the fan-out gate, which gives each
    /// connection the events in `publish` call order. A connection whose queue
    /// is closed is detached; delivery to the others continues.
    pub async fn publish(&self, message: &DisplayMessage) -> usize {
        let frame = match message.to_json() {
            Ok(frame) => frame,
            Err(err) => {
                warn!(kind = message.kind(), error = %err, "failed to serialize display event");
                return 0;
            }
        };

        let _order = self.fanout_gate.lock().await;
        let targets: Vec<(ConnectionId, FrameSender)> = {
            let connections = self.connections.lock().await;
            connections
                .iter()
                .map(|(id, tx)| (*id, tx.clone()))
                .collect()
        };

        let mut delivered = 0;
        let mut dead = Vec::new();
        for (id, tx) in targets {
            if tx.send(frame.clone()).is_ok() {
                delivered += 1;
            } else {
                warn!(connection = %id, kind = message.kind(), "send failed (writer closed), detaching display");
                dead.push(id);
            }
        }

        for id in dead {
            self.detach(id).await;
        }

        debug!(kind = message.kind(), delivered, "published display event");
        delivered
    }

    /// Number of currently attached displays.
    pub async fn connection_count(&self) -> usize {
        self.connections.lock().await.len()
    }
}

impl Default for DisplayHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dto::ws::DeletedEntity;

    fn snapshot_ok() -> impl Future<Output = Result<Snapshot, StorageError>> {
        async { Ok(Snapshot::default()) }
    }

    fn decode(frame: &str) -> DisplayMessage {
        DisplayMessage::from_json_str(frame).unwrap()
    }

    fn deleted_team(id: u32) -> DisplayMessage {
        DisplayMessage::TeamDeleted(DeletedEntity { id })
    }

    #[tokio::test]
    async fn attach_sends_snapshot_first() {
        let hub = DisplayHub::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        hub.attach(tx, snapshot_ok()).await.unwrap();
        hub.publish(&deleted_team(1)).await;

        assert!(matches!(decode(&rx.recv().await.unwrap()), DisplayMessage::Init(_)));
        assert_eq!(decode(&rx.recv().await.unwrap()), deleted_team(1));
        assert_eq!(hub.connection_count().await, 1);
    }

    #[tokio::test]
    async fn failed_snapshot_does_not_register() {
        let hub = DisplayHub::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let result = hub
            .attach(tx, async {
                Err(StorageError::unavailable(
                    "teams",
                    std::io::Error::other("offline"),
                ))
            })
            .await;

        assert!(matches!(result, Err(AttachError::Snapshot(_))));
        assert_eq!(hub.connection_count().await, 0);
        assert_eq!(hub.publish(&deleted_team(1)).await, 0);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn events_arrive_in_publish_order() {
        let hub = DisplayHub::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.attach(tx, snapshot_ok()).await.unwrap();

        for id in 1..=5 {
            hub.publish(&deleted_team(id)).await;
        }

        rx.recv().await.unwrap();
        for id in 1..=5 {
            assert_eq!(decode(&rx.recv().await.unwrap()), deleted_team(id));
        }
    }

    #[tokio::test]
    async fn dead_connection_is_detached_without_affecting_others() {
        let hub = DisplayHub::new();
        let (dead_tx, dead_rx) = mpsc::unbounded_channel();
        let (live_tx, mut live_rx) = mpsc::unbounded_channel();
        hub.attach(dead_tx, snapshot_ok()).await.unwrap();
        hub.attach(live_tx, snapshot_ok()).await.unwrap();
        drop(dead_rx);

        assert_eq!(hub.publish(&deleted_team(9)).await, 1);
        assert_eq!(hub.connection_count().await, 1);

        live_rx.recv().await.unwrap();
        assert_eq!(decode(&live_rx.recv().await.unwrap()), deleted_team(9));
    }

    #[tokio::test]
    async fn detach_is_idempotent() {
        let hub = DisplayHub::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.attach(tx, snapshot_ok()).await.unwrap();

        assert!(hub.detach(id).await);
        assert!(!hub.detach(id).await);
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn concurrent_publishers_keep_a_single_order_per_connection() {
        let hub = Arc::new(DisplayHub::new());
        let (first_tx, mut first_rx) = mpsc::unbounded_channel();
        let (second_tx, mut second_rx) = mpsc::unbounded_channel();
        hub.attach(first_tx, snapshot_ok()).await.unwrap();
        hub.attach(second_tx, snapshot_ok()).await.unwrap();

        let publishers: Vec<_> = (0..4)
            .map(|worker| {
                let hub = hub.clone();
                tokio::spawn(async move {
                    for n in 0..25 {
                        hub.publish(&deleted_team(worker * 100 + n)).await;
                    }
                })
            })
            .collect();
        for publisher in publishers {
            publisher.await.unwrap();
        }

        first_rx.recv().await.unwrap();
        second_rx.recv().await.unwrap();
        let mut first = Vec::new();
        let mut second = Vec::new();
        while let Ok(frame) = first_rx.try_recv() {
            first.push(frame);
        }
        while let Ok(frame) = second_rx.try_recv() {
            second.push(frame);
        }

        assert_eq!(first.len(), 100);
        assert_eq!(first, second);
    }
}
