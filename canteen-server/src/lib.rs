//! Canteen Server — campus canteen ordering backend
//!
//! # Module structure
//!
//! ```text
//! canteen-server/src/
//! ├── config.rs      # env-var configuration
//! ├── state.rs       # shared AppState
//! ├── error.rs       # AppError + API response envelope
//! ├── auth/          # JWT auth, argon2 passwords, CurrentUser
//! ├── db/            # SQLite pool + repository layer
//! ├── services/      # order lifecycle, surplus/donations, loyalty, payment
//! ├── message/       # live connection registry + WebSocket endpoint
//! ├── api/           # HTTP routes and handlers
//! └── tasks.rs       # background sweeps
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod message;
pub mod services;
pub mod state;
pub mod tasks;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use config::Config;
pub use error::{ApiResult, AppError, AppResponse};
pub use message::ConnectionRegistry;
pub use state::AppState;
