//! Surplus Donation Model

use serde::{Deserialize, Serialize};

/// Donation status: `scheduled → in_progress → completed`, no reverse moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Scheduled,
    InProgress,
    Completed,
}

impl DonationStatus {
    pub fn can_transition_to(&self, next: DonationStatus) -> bool {
        use DonationStatus::*;
        matches!((self, next), (Scheduled, InProgress) | (InProgress, Completed))
    }
}

impl std::fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DonationStatus::Scheduled => "scheduled",
            DonationStatus::InProgress => "in_progress",
            DonationStatus::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

/// Surplus donation entity — links a surplus-flagged menu item to an NGO.
/// Creation decrements the item's surplus quantity in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SurplusDonation {
    pub id: i64,
    pub ngo_id: i64,
    pub menu_item_id: i64,
    pub quantity: i64,
    pub donation_date: i64,
    pub status: DonationStatus,
    pub notes: Option<String>,
}

/// Create donation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurplusDonationCreate {
    pub ngo_id: i64,
    pub menu_item_id: i64,
    pub quantity: i64,
    pub notes: Option<String>,
}
