//! The `error` module defines the error type used across `feedboard`.
//!
//! Only the message store can fail. Delivery problems towards a single viewer
//! are absorbed by the hub and never become a `FeedError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The embedded database could not be opened, read, written or flushed.
    #[error("storage failure: {0}")]
    Storage(#[from] sled::Error),

    /// A stored record could not be encoded or decoded.
    #[error("message record codec failure: {0}")]
    Codec(#[from] serde_json::Error),

    /// A blocking store task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, FeedError>;
