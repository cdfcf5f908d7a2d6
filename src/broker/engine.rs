//! Broadcast hub
//!
//! The hub owns the registry of connected viewer sessions and fans events out
//! to them. Delivery is fire-and-forget and at most once per viewer:
//! - the registry lock is only held to copy the current senders, never while
//!   delivering, so register/unregister can run concurrently with a broadcast
//! - each session has a bounded queue drained by its own socket task; the hub
//!   uses `try_send` and never waits on a viewer
//! - a viewer whose queue is full is evicted so it reconnects with a fresh
//!   snapshot instead of silently diverging

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::broker::message::{Delivery, FeedEvent};
use crate::persistence::Message;
use crate::session::{Session, SessionId};

#[derive(Debug, Default)]
pub struct Hub {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a viewer to the live set. Every broadcast that starts after this
    /// returns reaches the session.
    pub fn register(&self, session: Session) {
        debug!(session = %session.id, "registered viewer");
        self.write_sessions().insert(session.id.clone(), session);
    }

    /// Remove a viewer. Returns `false` if it was not registered (already
    /// evicted or never added).
    pub fn unregister(&self, session_id: &SessionId) -> bool {
        let removed = self.write_sessions().remove(session_id).is_some();
        if removed {
            debug!(session = %session_id, "unregistered viewer");
        }
        removed
    }

    pub fn broadcast_new_message(&self, message: &Message) -> Delivery {
        self.fan_out(FeedEvent::NewPost(message.clone()))
    }

    pub fn broadcast_clear(&self) -> Delivery {
        self.fan_out(FeedEvent::ClearFeed)
    }

    pub fn session_count(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_registered(&self, session_id: &SessionId) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(session_id)
    }

    fn fan_out(&self, event: FeedEvent) -> Delivery {
        let targets: Vec<(SessionId, Sender<FeedEvent>)> = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|s| (s.id.clone(), s.sender.clone()))
            .collect();

        let mut delivery = Delivery::default();
        let mut stalled = Vec::new();

        for (session_id, sender) in targets {
            match sender.try_send(event.clone()) {
                Ok(()) => delivery.delivered += 1,
                Err(TrySendError::Closed(_)) => {
                    debug!(session = %session_id, "viewer queue closed, skipping");
                    delivery.skipped += 1;
                }
                Err(TrySendError::Full(_)) => {
                    warn!(session = %session_id, "viewer queue full, evicting");
                    stalled.push(session_id);
                }
            }
        }

        if !stalled.is_empty() {
            let mut sessions = self.write_sessions();
            for session_id in stalled {
                if sessions.remove(&session_id).is_some() {
                    delivery.evicted += 1;
                }
            }
        }

        delivery
    }

    fn write_sessions(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}
