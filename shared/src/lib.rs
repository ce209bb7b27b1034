//! Shared types for the canteen platform
//!
//! Domain models, push-message payloads and small helpers used by the
//! server and by API clients.

pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Push message re-exports (for convenient access)
pub use message::{ClientMessage, PushMessage};
