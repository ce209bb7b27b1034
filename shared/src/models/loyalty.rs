//! Loyalty Program Models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum RewardType {
    Discount,
    FreeItem,
    Other,
}

/// Loyalty reward entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LoyaltyReward {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub points_required: i64,
    pub reward_type: RewardType,
    pub reward_value: String,
    pub is_active: bool,
}

/// Create reward payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyRewardCreate {
    pub name: String,
    pub description: String,
    pub points_required: i64,
    pub reward_type: RewardType,
    pub reward_value: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Update reward payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoyaltyRewardUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub points_required: Option<i64>,
    pub reward_type: Option<RewardType>,
    pub reward_value: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum RedemptionStatus {
    Pending,
    Applied,
    Expired,
}

/// Reward redemption entity — one row per debit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RewardRedemption {
    pub id: i64,
    pub user_id: i64,
    pub reward_id: i64,
    pub points_used: i64,
    pub status: RedemptionStatus,
    pub redeemed_at: i64,
}

/// Loyalty accrual ledger row — `order_id` is UNIQUE so a payment
/// confirmation can only ever credit an order once
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LoyaltyAccrual {
    pub id: i64,
    pub order_id: i64,
    pub user_id: i64,
    pub points: i64,
    pub created_at: i64,
}
