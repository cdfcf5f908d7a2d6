use crate::persistence::Message;
use crate::utils::Result;

/// The operations the board needs from a message store.
///
/// Each `*_then` method runs its callback while the store still excludes
/// every other writer, so whatever the callback does (fanning out to viewers)
/// is ordered exactly like the writes themselves. `snapshot_then` excludes
/// writers too, but not other readers.
pub trait MessageLog: Send + Sync + 'static {
    /// Append a message, then run `f` on the stored row.
    fn insert_then<R>(
        &self,
        username: &str,
        text: &str,
        f: impl FnOnce(&Message) -> R,
    ) -> Result<(Message, R)>;

    /// Remove every row, then run `f`.
    fn clear_then<R>(&self, f: impl FnOnce() -> R) -> Result<R>;

    /// Capture the newest-first history, then run `f`.
    fn snapshot_then<R>(&self, f: impl FnOnce() -> R) -> Result<(Vec<Message>, R)>;

    /// All current messages, newest first.
    fn list_all(&self) -> Result<Vec<Message>>;
}
