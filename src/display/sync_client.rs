use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::{
    dto::ws::{DisplayMessage, Snapshot},
    error::SyncError,
};

/// Lifecycle of the hub connection. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport; a reconnect may be pending.
    Disconnected,
    /// Handshake in progress.
    Connecting,
    /// Transport up and frames flowing.
    Connected,
}

/// What the transport task hands to the display task.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncUpdate {
    /// The transport is up; a snapshot follows.
    Connected,
    /// Full state; replaces the mirror.
    Snapshot(Snapshot),
    /// Incremental change received after the snapshot.
    Event(DisplayMessage),
    /// The transport dropped; a reconnect is scheduled.
    Disconnected,
}

/// Per-connection decoding state.
///
/// Events that arrive before the snapshot are dropped: the snapshot that
/// follows supersedes them.
#[derive(Debug, Default)]
pub struct ConnectionSession {
    synced: bool,
}

impl ConnectionSession {
    /// Decode one text frame. `Ok(None)` means the frame carries nothing to
    /// forward yet.
    pub fn handle_text(&mut self, text: &str) -> Result<Option<SyncUpdate>, SyncError> {
        match DisplayMessage::from_json_str(text)? {
            DisplayMessage::Init(snapshot) => {
                self.synced = true;
                Ok(Some(SyncUpdate::Snapshot(snapshot)))
            }
            event if self.synced => Ok(Some(SyncUpdate::Event(event))),
            event => {
                debug!(kind = event.kind(), "dropping event received before snapshot");
                Ok(None)
            }
        }
    }
}

/// Connects to the broadcast hub and forwards snapshots and events to the
/// display task. Reconnects after a fixed delay whenever the transport drops.
///
/// Runs until `shutdown` flips to `true` (or its sender is dropped), or the
/// display task stops listening.
pub struct SyncClient {
    url: String,
    reconnect_delay: Duration,
    updates: mpsc::Sender<SyncUpdate>,
    shutdown: watch::Receiver<bool>,
    state: watch::Sender<ConnectionState>,
}

impl SyncClient {
    /// Build a client for the hub at `url`. Nothing connects until [`Self::run`].
    pub fn new(
        url: impl Into<String>,
        reconnect_delay: Duration,
        updates: mpsc::Sender<SyncUpdate>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            url: url.into(),
            reconnect_delay,
            updates,
            shutdown,
            state,
        }
    }

    /// Observe connection state changes.
    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Connect, forward, and reconnect until shut down.
    pub async fn run(mut self) -> Result<(), SyncError> {
        loop {
            if self.shutdown_requested() {
                info!("sync client: shutdown requested");
                return Ok(());
            }

            let result = self.connect_and_listen().await;
            let was_connected = *self.state.borrow() == ConnectionState::Connected;
            self.state.send_replace(ConnectionState::Disconnected);

            match result {
                Ok(()) => info!(url = %self.url, "sync client: connection closed"),
                Err(SyncError::ConsumerGone) => {
                    info!("sync client: display task stopped, shutting down");
                    return Ok(());
                }
                Err(err) => warn!(url = %self.url, error = %err, "sync client: connection error"),
            }

            if was_connected && self.updates.send(SyncUpdate::Disconnected).await.is_err() {
                return Ok(());
            }
            if self.shutdown_requested() {
                return Ok(());
            }

            // Wait before retrying, but bail if shut down.
            tokio::select! {
                _ = self.shutdown.changed() => {
                    info!("sync client: shutdown during reconnect delay");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.reconnect_delay) => {
                    info!(
                        url = %self.url,
                        delay_ms = self.reconnect_delay.as_millis() as u64,
                        "sync client: reconnecting"
                    );
                }
            }
        }
    }

    /// Single connection attempt: connect, forward frames until close or error.
    async fn connect_and_listen(&mut self) -> Result<(), SyncError> {
        self.state.send_replace(ConnectionState::Connecting);
        let (ws_stream, _response) = tokio::select! {
            _ = self.shutdown.changed() => return Ok(()),
            connected = connect_async(self.url.as_str()) => connected?,
        };
        info!(url = %self.url, "sync client: connected to hub");
        self.state.send_replace(ConnectionState::Connected);
        self.forward(SyncUpdate::Connected).await?;

        let (mut write, mut read) = ws_stream.split();
        let mut session = ConnectionSession::default();

        loop {
            tokio::select! {
                _ = self.shutdown.changed() => {
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(());
                }
                message = read.next() => match message {
                    Some(Ok(Message::Text(text))) => match session.handle_text(&text) {
                        Ok(Some(update)) => self.forward(update).await?,
                        Ok(None) => {}
                        // A bad frame is skipped; the connection stays up.
                        Err(err) => warn!(error = %err, "discarding display message"),
                    },
                    Some(Ok(Message::Ping(payload))) => write.send(Message::Pong(payload)).await?,
                    Some(Ok(Message::Close(_))) | None => return Ok(()),
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err.into()),
                },
            }
        }
    }

    async fn forward(&self, update: SyncUpdate) -> Result<(), SyncError> {
        self.updates
            .send(update)
            .await
            .map_err(|_| SyncError::ConsumerGone)
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown.borrow() || self.shutdown.has_changed().is_err()
    }
}
