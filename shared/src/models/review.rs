//! Review Model

use serde::{Deserialize, Serialize};

/// Review entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub menu_item_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: i64,
}

/// Create review payload (user id comes from the session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreate {
    pub menu_item_id: i64,
    /// 1..=5
    pub rating: i64,
    pub comment: Option<String>,
}
