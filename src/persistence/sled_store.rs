use std::path::Path;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::{Db, Tree};
use tracing::debug;

use crate::persistence::MessageLog;
use crate::utils::Result;

const MESSAGES_TREE: &str = "messages";

/// A posted message as stored and as shown to viewers.
///
/// `id` and `created_at` are assigned by the store, never by the caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only log of messages backed by a `sled` tree.
///
/// `insert` and `clear` take the write side of `lock`, `list_all` the read
/// side, so each call observes a consistent point-in-time state.
pub struct MessageStore {
    db: Db,
    messages: Tree,
    lock: RwLock<()>,
}

impl MessageStore {
    /// Open or create the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)?;
        let messages = db.open_tree(MESSAGES_TREE)?;
        Ok(Self {
            db,
            messages,
            lock: RwLock::new(()),
        })
    }

    /// Assign an id and timestamp, append the row and return it.
    ///
    /// Ids come from `Db::generate_id`, which never hands out the same value
    /// twice for a database, including across `clear` and restarts.
    pub fn insert(&self, username: &str, text: &str) -> Result<Message> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        self.append(username, text)
    }

    /// All current messages, newest first.
    pub fn list_all(&self) -> Result<Vec<Message>> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        self.read_all()
    }

    /// Remove every row. Clearing an empty store succeeds.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        self.wipe()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn append(&self, username: &str, text: &str) -> Result<Message> {
        let message = Message {
            id: self.db.generate_id()?,
            username: username.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        };

        let serialized = serde_json::to_vec(&message)?;
        self.messages.insert(message.id.to_be_bytes(), serialized)?;
        self.messages.flush()?;

        debug!(id = message.id, "stored message");
        Ok(message)
    }

    fn wipe(&self) -> Result<()> {
        self.messages.clear()?;
        self.messages.flush()?;
        debug!("cleared message store");
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Message>> {
        let mut rows = Vec::with_capacity(self.messages.len());
        for entry in self.messages.iter().rev() {
            let (_, value) = entry?;
            rows.push(serde_json::from_slice::<Message>(&value)?);
        }
        // key order is id order; created_at only disagrees if the clock stepped back
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }
}

impl MessageLog for MessageStore {
    fn insert_then<R>(
        &self,
        username: &str,
        text: &str,
        f: impl FnOnce(&Message) -> R,
    ) -> Result<(Message, R)> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let message = self.append(username, text)?;
        let after = f(&message);
        Ok((message, after))
    }

    fn clear_then<R>(&self, f: impl FnOnce() -> R) -> Result<R> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        self.wipe()?;
        Ok(f())
    }

    fn snapshot_then<R>(&self, f: impl FnOnce() -> R) -> Result<(Vec<Message>, R)> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.read_all()?;
        Ok((snapshot, f()))
    }

    fn list_all(&self) -> Result<Vec<Message>> {
        MessageStore::list_all(self)
    }
}

impl std::fmt::Debug for MessageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageStore")
            .field("db", &"sled::Db")
            .field("rows", &self.messages.len())
            .finish()
    }
}
