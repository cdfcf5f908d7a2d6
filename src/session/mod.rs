//! The `session` module defines connected viewers and the gateway that
//! attaches them to the hub.

pub mod gateway;
pub mod viewer;

pub use gateway::{Attachment, SessionGuard, connect};
pub use viewer::{Session, SessionId};
