//! Menu Item Model

use serde::{Deserialize, Serialize};

use super::Category;

/// Menu item entity.
///
/// Surplus sub-state invariant: `is_surplus = true` implies
/// `surplus_quantity > 0` and a future `surplus_expiry_time`; the moment
/// the quantity reaches 0 the flag is cleared (donation path enforces this
/// inside the same transaction as the decrement).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category_id: i64,
    pub is_available: bool,
    /// Derived: recomputed from reviews on every review insert
    pub rating: f64,
    /// Derived: recomputed from reviews on every review insert
    pub review_count: i64,
    pub is_surplus: bool,
    pub surplus_price: Option<f64>,
    pub surplus_expiry_time: Option<i64>,
    pub surplus_quantity: i64,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category_id: i64,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

/// Update menu item payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub category_id: Option<i64>,
    pub is_available: Option<bool>,
}

/// Mark-as-surplus payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurplusMark {
    pub surplus_price: f64,
    /// Epoch millis, must be in the future
    pub surplus_expiry_time: i64,
    pub surplus_quantity: i64,
}

/// Menu item joined with its category (list/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemWithCategory {
    #[serde(flatten)]
    pub item: MenuItem,
    pub category: Category,
}
