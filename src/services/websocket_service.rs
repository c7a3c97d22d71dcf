use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::state::SharedState;

/// Handle the full lifecycle of one display WebSocket connection.
///
/// The display receives a snapshot as its first frame and every published
/// event afterwards. Inbound text is ignored; the socket only has to be read
/// to notice pings and closure.
pub async fn handle_display_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel::<String>();
    let (control_tx, mut control_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps hub frames flowing while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        loop {
            let message = tokio::select! {
                biased;
                Some(control) = control_rx.recv() => control,
                Some(frame) = frame_rx.recv() => Message::Text(frame.into()),
                else => break,
            };
            let closing = matches!(message, Message::Close(_));
            if sender.send(message).await.is_err() || closing {
                break;
            }
        }
    });

    let connection_id = match state.hub().attach(frame_tx, state.snapshot()).await {
        Ok(id) => id,
        Err(err) => {
            warn!(error = %err, "failed to attach display; closing socket");
            let _ = control_tx.send(Message::Close(None));
            finalize(writer_task, control_tx).await;
            return;
        }
    };

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                debug!(connection = %connection_id, payload = %text, "ignoring display message");
            }
            Ok(Message::Ping(payload)) => {
                let _ = control_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                info!(connection = %connection_id, "display closed");
                let _ = control_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(connection = %connection_id, error = %err, "websocket error");
                break;
            }
        }
    }

    state.hub().detach(connection_id).await;
    finalize(writer_task, control_tx).await;
}

/// Ensure the writer task winds down before we return from the socket handler.
///
/// The hub side of the frame channel is dropped by `detach`, so once the
/// control sender is gone the writer drains and exits.
async fn finalize(writer_task: JoinHandle<()>, control_tx: mpsc::UnboundedSender<Message>) {
    drop(control_tx);
    let _ = writer_task.await;
}
