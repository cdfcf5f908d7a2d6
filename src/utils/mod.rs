//! The `utils` module provides the pieces shared by every layer of `feedboard`:
//! the crate-wide error type and tracing setup.

pub mod error;
pub mod logging;

pub use error::{FeedError, Result};

#[cfg(test)]
mod tests;
