use tokio::sync::mpsc::{self, Receiver, Sender};
use uuid::Uuid;

use crate::broker::FeedEvent;

pub type SessionId = String;

/// A connected viewer as seen by the hub.
///
/// Each session is identified by an opaque `id` and owns the sending half of
/// its outbound queue. The receiving half is drained by the viewer's socket task.
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub sender: Sender<FeedEvent>,
}

impl Session {
    pub fn new(sender: Sender<FeedEvent>) -> Self {
        Self {
            id: format!("viewer-{}", Uuid::new_v4()),
            sender,
        }
    }

    /// A session with a fresh bounded queue of `capacity` events.
    pub fn channel(capacity: usize) -> (Self, Receiver<FeedEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}
