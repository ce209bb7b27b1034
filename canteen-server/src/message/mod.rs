//! Live push messaging
//!
//! Connected clients are tracked in a [`ConnectionRegistry`]; services push
//! [`shared::PushMessage`] frames through it after persisting their writes.

mod registry;
pub mod ws;

pub use registry::ConnectionRegistry;
