//! The broadcast hub: the live set of viewer sessions and the fan-out of
//! `new_post` / `clear_feed` events to them.

pub mod engine;
pub mod message;

pub use engine::Hub;
pub use message::{Delivery, FeedEvent};
