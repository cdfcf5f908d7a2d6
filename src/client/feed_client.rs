use anyhow::Context;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::transport::message::ServerMessage;

/// A connected viewer.
pub struct FeedClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl FeedClient {
    /// Connect to a board's WebSocket endpoint, e.g. `ws://127.0.0.1:3000/ws`.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let (stream, _response) = connect_async(url)
            .await
            .with_context(|| format!("failed to connect to {url}"))?;
        Ok(Self { stream })
    }

    /// Next server frame. `None` once the server closed the connection.
    pub async fn next_event(&mut self) -> anyhow::Result<Option<ServerMessage>> {
        while let Some(frame) = self.stream.next().await {
            match frame? {
                WsMessage::Text(text) => {
                    let event = serde_json::from_str(text.as_str())
                        .with_context(|| format!("unexpected frame: {}", text.as_str()))?;
                    return Ok(Some(event));
                }
                WsMessage::Close(_) => return Ok(None),
                _ => continue,
            }
        }
        Ok(None)
    }

    pub async fn close(mut self) -> anyhow::Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}

impl std::fmt::Debug for FeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedClient").finish_non_exhaustive()
    }
}
