use std::sync::Arc;

use tracing::{debug, info};

use crate::broker::Hub;
use crate::persistence::{Message, MessageLog, MessageStore};
use crate::utils::Result;

/// Username stored when the poster gives none.
pub const DEFAULT_USERNAME: &str = "Anonymous";

/// The request-facing operations of the board.
///
/// Each operation writes the store first and fans out while the store still
/// holds its write lock. A failed write is never announced, a failed delivery
/// never undoes a write, and concurrent posts and clears reach every viewer
/// in the order the store applied them.
pub struct Board<S: MessageLog = MessageStore> {
    store: Arc<S>,
    hub: Arc<Hub>,
}

impl<S: MessageLog> Board<S> {
    pub fn new(store: Arc<S>, hub: Arc<Hub>) -> Self {
        Self { store, hub }
    }

    /// Store a message and announce it to every registered viewer.
    ///
    /// The poster gets no special echo; it sees its own message through the
    /// broadcast like everyone else.
    pub fn post(&self, username: Option<&str>, text: Option<&str>) -> Result<Message> {
        let username = normalize_username(username);
        let (message, delivery) = self
            .store
            .insert_then(username, text.unwrap_or_default(), |message| {
                self.hub.broadcast_new_message(message)
            })?;

        info!(
            id = message.id,
            username = %message.username,
            delivered = delivery.delivered,
            evicted = delivery.evicted,
            "posted message"
        );
        Ok(message)
    }

    /// Wipe history and tell every registered viewer.
    pub fn clear(&self) -> Result<()> {
        let delivery = self.store.clear_then(|| self.hub.broadcast_clear())?;
        info!(
            delivered = delivery.delivered,
            evicted = delivery.evicted,
            "cleared feed"
        );
        Ok(())
    }

    /// Current history, newest first.
    pub fn history(&self) -> Result<Vec<Message>> {
        let messages = self.store.list_all()?;
        debug!(count = messages.len(), "read history");
        Ok(messages)
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }
}

impl<S: MessageLog> Clone for Board<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            hub: self.hub.clone(),
        }
    }
}

impl<S: MessageLog> std::fmt::Debug for Board<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("hub", &self.hub)
            .finish_non_exhaustive()
    }
}

/// Absent or empty usernames become `DEFAULT_USERNAME`. Anything else is kept verbatim.
pub fn normalize_username(username: Option<&str>) -> &str {
    match username {
        Some(name) if !name.is_empty() => name,
        _ => DEFAULT_USERNAME,
    }
}
