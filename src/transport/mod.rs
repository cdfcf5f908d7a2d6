//! The `transport` module exposes the board over HTTP and WebSockets.
//!
//! `http` holds the routes (`GET /`, `GET /messages`, `POST /post`,
//! `POST /clear`, `GET /ws`), `websocket` pumps events to one connected
//! viewer, `message` defines the wire types and `page` renders the HTML view.

pub mod http;
pub mod message;
pub mod page;
pub mod websocket;

use std::future::Future;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;

use crate::board::Board;
use crate::config::HubSettings;
use crate::utils::Result;

pub use http::router;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub board: Board,
    pub session_buffer: usize,
    pub write_timeout: Duration,
}

impl AppState {
    pub fn new(board: Board, hub: &HubSettings) -> Self {
        Self {
            board,
            session_buffer: hub.session_buffer,
            write_timeout: Duration::from_millis(hub.write_timeout_ms),
        }
    }
}

/// Run a store-touching closure off the async workers. Writes flush sled and
/// every store call may wait on the store lock.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

/// Serve the board on `listener` until `shutdown` resolves.
pub async fn start_server(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Feedboard listening on http://{addr} (viewers at ws://{addr}/ws)");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
