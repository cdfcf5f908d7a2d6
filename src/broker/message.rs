//! Events fanned out by the hub.
//!
//! `FeedEvent` is both the item type of every viewer queue and the wire shape
//! of the live events (`new_post`, `clear_feed`), tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::persistence::Message;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    /// A message was stored. Serialized as `{"type":"new_post", id, username, text, created_at}`.
    NewPost(Message),
    /// History was wiped for everyone.
    ClearFeed,
}

/// Outcome of one fan-out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Sessions that had the event queued.
    pub delivered: usize,
    /// Sessions whose queue was already closed.
    pub skipped: usize,
    /// Sessions removed because their queue was full.
    pub evicted: usize,
}
