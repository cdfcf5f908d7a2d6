//! The `client` module is a minimal viewer: it connects to `/ws` and yields
//! the frames the server pushes. The `watch` subcommand and the end-to-end
//! tests drive the board through it.

pub mod feed_client;
pub use feed_client::FeedClient;
