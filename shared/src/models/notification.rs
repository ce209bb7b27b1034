//! Notification Model
//!
//! Durable per-user notifications. Lifecycle: create → (read) → removed by
//! the periodic expiry sweep once `expires_at` has passed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    General,
    Surplus,
    Order,
    Reward,
}

/// Notification entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    #[cfg_attr(feature = "db", sqlx(rename = "kind"))]
    pub kind: NotificationType,
    pub is_read: bool,
    pub created_at: i64,
    pub related_item_id: Option<i64>,
    pub expires_at: Option<i64>,
}

/// Create notification payload (internal — managers create these)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreate {
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub kind: NotificationType,
    pub related_item_id: Option<i64>,
    pub expires_at: Option<i64>,
}
