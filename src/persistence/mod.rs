//! The `persistence` module holds the message store: the single source of truth
//! for the board's history.
//!
//! It uses `sled` as an embedded key-value store. Rows are keyed by a
//! store-generated id so key order is insertion order, and every write is
//! flushed before it is acknowledged. `MessageLog` is the seam the board
//! depends on.

pub mod log;
pub mod sled_store;

pub use log::MessageLog;
pub use sled_store::{Message, MessageStore};
