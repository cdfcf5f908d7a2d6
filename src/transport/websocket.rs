use std::time::Duration;

use anyhow::{Context, anyhow};
use axum::extract::State;
use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures_util::{Sink, SinkExt, StreamExt};
use tracing::{debug, error};

use crate::session::{self, Attachment};
use crate::transport::{AppState, blocking};
use crate::transport::message::ServerMessage;

pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Serve one viewer: snapshot first, then every queued event until either
/// side goes away. Dropping the guard at the end deregisters the viewer.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let Attachment {
        snapshot,
        mut events,
        guard,
    } = match blocking({
        let board = state.board.clone();
        let capacity = state.session_buffer;
        move || session::connect(&board, capacity)
    })
    .await
    {
        Ok(attachment) => attachment,
        Err(e) => {
            error!("Failed to attach viewer: {e}");
            return;
        }
    };

    let session_id = guard.id().clone();
    let write_timeout = state.write_timeout;
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        let snapshot = ServerMessage::Snapshot { messages: snapshot };
        send_frame(&mut ws_sender, &snapshot, write_timeout).await?;

        while let Some(event) = events.recv().await {
            send_frame(&mut ws_sender, &ServerMessage::from(event), write_timeout).await?;
        }

        // queue closed: the hub evicted this viewer
        let _ = ws_sender.send(WsMessage::Close(None)).await;
        Ok::<_, anyhow::Error>(())
    });

    // inbound frames carry nothing but liveness
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_receiver.next().await {
            if let WsMessage::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        result = &mut send_task => {
            if let Ok(Err(e)) = result {
                debug!(session = %session_id, "send loop ended: {e:#}");
            }
            recv_task.abort();
        }
        _ = &mut recv_task => send_task.abort(),
    }

    drop(guard);
}

/// Write one frame, giving up after `write_timeout` so a viewer that stopped
/// reading cannot hold its session open.
pub(crate) async fn send_frame<S>(
    sink: &mut S,
    frame: &ServerMessage,
    write_timeout: Duration,
) -> anyhow::Result<()>
where
    S: Sink<WsMessage> + Unpin,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let text = serde_json::to_string(frame)?;
    tokio::time::timeout(write_timeout, sink.send(WsMessage::Text(text.into())))
        .await
        .map_err(|_| anyhow!("write timed out after {write_timeout:?}"))?
        .context("websocket write failed")
}
