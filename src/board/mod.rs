//! The `board` module coordinates the two write operations, post and clear,
//! across the message store and the broadcast hub.

pub mod service;

pub use service::{Board, DEFAULT_USERNAME, normalize_username};

#[cfg(test)]
mod tests;
