//! Data models
//!
//! Shared between canteen-server and clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are epoch millis.

pub mod category;
pub mod donation;
pub mod loyalty;
pub mod menu_item;
pub mod ngo;
pub mod notification;
pub mod order;
pub mod review;
pub mod user;

// Re-exports
pub use category::*;
pub use donation::*;
pub use loyalty::*;
pub use menu_item::*;
pub use ngo::*;
pub use notification::*;
pub use order::*;
pub use review::*;
pub use user::*;
