//! Order Model
//!
//! Order status is a linear state machine:
//! `placed → preparing → ready → completed`, with `placed → cancelled`
//! as the only side exit. `completed` and `cancelled` are terminal.

use serde::{Deserialize, Serialize};

use super::UserProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Placed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Whether `self → next` is a legal transition
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Placed, Preparing) | (Preparing, Ready) | (Ready, Completed) | (Placed, Cancelled)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Placed => "placed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub created_at: i64,
    pub is_preorder: bool,
    pub pickup_time: Option<i64>,
    pub special_instructions: Option<String>,
}

/// Order line — menu item snapshot (quantity + unit price captured at order
/// time, decoupled from the live menu price)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub quantity: i64,
    pub price: f64,
}

/// Order line joined with the current menu item name (detail views, pushes)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItemDetail {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub quantity: i64,
    pub price: f64,
    pub menu_item_name: String,
}

/// Requested line when placing or editing an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub menu_item_id: i64,
    pub quantity: i64,
    pub price: f64,
}

/// Place order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderItemRequest>,
    #[serde(default)]
    pub is_preorder: bool,
    pub pickup_time: Option<i64>,
    pub special_instructions: Option<String>,
}

/// Edit order payload — replaces the full item list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEdit {
    pub items: Vec<OrderItemRequest>,
    pub special_instructions: Option<String>,
}

/// Order with its lines and owning user (detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
    pub user: UserProfile,
}
