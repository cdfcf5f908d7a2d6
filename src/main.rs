//! CLI for Feedboard
//!
//! Subcommands:
//! - `serve` (default): run the board server
//! - `watch`: connect as a viewer and print every event

use std::sync::Arc;

use clap::{Parser, Subcommand};
use feedboard::board::Board;
use feedboard::broker::Hub;
use feedboard::client::FeedClient;
use feedboard::config::load_config;
use feedboard::persistence::MessageStore;
use feedboard::transport::{AppState, start_server};
use feedboard::utils::logging;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "feedboard", about = "A minimal real-time message board")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the board server
    Serve,
    /// Connect as a viewer and print events as JSON lines
    Watch {
        /// WebSocket endpoint of a running board
        #[arg(long, default_value = "ws://127.0.0.1:3000/ws")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let settings = load_config()?;
    logging::init(&settings.logging.level);

    match Cli::parse().command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(settings).await,
        Command::Watch { url } => run_watch(&url).await,
    }
}

async fn run_server(settings: feedboard::config::Settings) -> anyhow::Result<()> {
    let store = Arc::new(MessageStore::open(&settings.storage.path)?);
    if settings.storage.reset_on_start {
        warn!("storage.reset_on_start is set, wiping history");
        store.clear()?;
    }
    info!(path = %settings.storage.path, messages = store.len(), "Opened message store");

    let board = Board::new(store, Arc::new(Hub::new()));
    let listener = TcpListener::bind(settings.bind_addr()).await?;
    let state = AppState::new(board, &settings.hub);

    start_server(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutdown signal received. Exiting gracefully.");
    })
    .await?;

    Ok(())
}

async fn run_watch(url: &str) -> anyhow::Result<()> {
    let mut client = FeedClient::connect(url).await?;
    info!("Watching {url}");

    while let Some(event) = client.next_event().await? {
        println!("{}", serde_json::to_string(&event)?);
    }

    info!("Server closed the connection");
    Ok(())
}
