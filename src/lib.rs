//! # Feedboard
//!
//! `feedboard` is a minimal real-time message board. Clients post short
//! messages under a display name, every connected viewer sees new messages
//! appear live, and any client can clear the shared history for everyone.
//!
//! ## Core Modules
//!
//! - `persistence`: the durable, append-only message store (`sled`).
//! - `broker`: the broadcast hub that fans events out to connected viewers.
//! - `board`: the post and clear operations, store first and broadcast second.
//! - `session`: viewer sessions and the gateway that snapshots and registers them.
//! - `transport`: HTTP routes, the WebSocket pump and the rendered page (`axum`).
//! - `client`: a small WebSocket viewer used by the CLI and tests.
//! - `config`: loading settings from files and environment.
//! - `utils`: shared error type and logging setup.
//!
//! Usernames and texts are untrusted. Anything rendering them as markup must
//! escape them; `transport::page` does.

pub mod board;
pub mod broker;
pub mod client;
pub mod config;
pub mod persistence;
pub mod session;
pub mod transport;
pub mod utils;
