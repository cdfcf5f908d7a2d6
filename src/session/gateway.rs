//! Session gateway
//!
//! Turns a new connection into a registered viewer. The snapshot is captured
//! and the session registered under one store read lock, so a message is
//! either in the snapshot or broadcast to the session afterwards (possibly
//! both, never neither).

use std::sync::Arc;

use tokio::sync::mpsc::Receiver;
use tracing::info;

use crate::board::Board;
use crate::broker::{FeedEvent, Hub};
use crate::persistence::{Message, MessageLog};
use crate::session::{Session, SessionId};
use crate::utils::Result;

/// Everything a transport needs to serve one viewer.
#[derive(Debug)]
pub struct Attachment {
    /// History at connect time, newest first.
    pub snapshot: Vec<Message>,
    /// Live events queued for this viewer after registration.
    pub events: Receiver<FeedEvent>,
    /// Deregisters the viewer when dropped.
    pub guard: SessionGuard,
}

/// Unregisters its session from the hub on drop.
#[derive(Debug)]
pub struct SessionGuard {
    id: SessionId,
    hub: Arc<Hub>,
}

impl SessionGuard {
    pub fn id(&self) -> &SessionId {
        &self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.hub.unregister(&self.id);
        info!(session = %self.id, "viewer disconnected");
    }
}

/// Snapshot the store and register a new viewer with a queue of `capacity` events.
pub fn connect<S: MessageLog>(board: &Board<S>, capacity: usize) -> Result<Attachment> {
    let (session, events) = Session::channel(capacity);
    let id = session.id.clone();
    let hub = board.hub().clone();

    let (snapshot, ()) = board.store().snapshot_then(|| hub.register(session))?;
    info!(session = %id, messages = snapshot.len(), "viewer connected");

    Ok(Attachment {
        snapshot,
        events,
        guard: SessionGuard { id, hub },
    })
}
