//! Order lifecycle service
//!
//! Placing, editing, status moves and payment confirmation. Every push frame
//! is sent only after the corresponding write has committed.

use serde::Serialize;
use shared::message::{NewOrderPayload, OrderUpdatePayload, PushOrderLine};
use shared::models::{
    NotificationCreate, NotificationType, Order, OrderCreate, OrderEdit, OrderItemRequest,
    OrderStatus, OrderWithItems, Role,
};
use shared::PushMessage;
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::db::repository::{menu_items, notifications, orders, users, loyalty};
use crate::error::AppError;
use crate::message::ConnectionRegistry;

/// Points credited per order: 10% of the total, rounded down
fn points_for(total_amount: f64) -> i64 {
    (total_amount * 0.10).floor() as i64
}

/// Validate requested lines and compute the order total server-side.
/// Client-sent prices are taken as submitted; quantities and item existence
/// are checked here.
async fn validate_items(pool: &SqlitePool, items: &[OrderItemRequest]) -> Result<f64, AppError> {
    if items.is_empty() {
        return Err(AppError::validation("Order must contain at least one item"));
    }
    let mut total = 0.0;
    for item in items {
        if item.quantity < 1 {
            return Err(AppError::validation("Item quantity must be at least 1"));
        }
        if item.price < 0.0 {
            return Err(AppError::validation("Item price must not be negative"));
        }
        if menu_items::find_by_id(pool, item.menu_item_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Menu item {} not found",
                item.menu_item_id
            )));
        }
        total += item.price * item.quantity as f64;
    }
    Ok(total)
}

fn push_lines(order: &OrderWithItems) -> Vec<PushOrderLine> {
    order
        .items
        .iter()
        .map(|i| PushOrderLine {
            name: i.menu_item_name.clone(),
            quantity: i.quantity,
        })
        .collect()
}

/// Place a new order. Students only.
pub async fn place(
    pool: &SqlitePool,
    registry: &ConnectionRegistry,
    user: &CurrentUser,
    payload: OrderCreate,
) -> Result<OrderWithItems, AppError> {
    if user.role != Role::Student {
        return Err(AppError::forbidden("Only students can place orders"));
    }

    let total = validate_items(pool, &payload.items).await?;

    let order = orders::create(
        pool,
        user.id,
        total,
        &payload.items,
        payload.is_preorder,
        payload.pickup_time,
        payload.special_instructions.as_deref(),
    )
    .await?;

    let detail = orders::with_items(pool, order.id)
        .await?
        .ok_or_else(|| AppError::internal("Order vanished after create"))?;

    tracing::info!(order_id = order.id, user_id = user.id, total, "Order placed");

    // Notify connected kitchen-side users. Role is resolved per connected id
    // because the registry only knows user ids.
    let frame = PushMessage::NewOrder {
        order: NewOrderPayload {
            id: detail.order.id,
            user_id: user.id,
            customer_name: user.name.clone(),
            total_amount: detail.order.total_amount,
            items: push_lines(&detail),
        },
    };
    for uid in registry.connected_user_ids() {
        if uid == user.id {
            continue;
        }
        if let Some(u) = users::find_by_id(pool, uid).await? {
            if u.role.is_staff() {
                registry.send_to_user(uid, &frame);
            }
        }
    }

    Ok(detail)
}

/// Orders visible to the caller: staff see everything, students their own
pub async fn list_for(pool: &SqlitePool, user: &CurrentUser) -> Result<Vec<Order>, AppError> {
    let rows = if user.role.is_staff() {
        orders::find_all(pool).await?
    } else {
        orders::find_by_user(pool, user.id).await?
    };
    Ok(rows)
}

/// One order with its lines; owner or staff only
pub async fn get(
    pool: &SqlitePool,
    user: &CurrentUser,
    order_id: i64,
) -> Result<OrderWithItems, AppError> {
    let detail = orders::with_items(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;
    if detail.order.user_id != user.id && !user.role.is_staff() {
        return Err(AppError::forbidden("Not your order"));
    }
    Ok(detail)
}

/// Replace the item list of a still-placed order. Owner or admin.
pub async fn edit(
    pool: &SqlitePool,
    user: &CurrentUser,
    order_id: i64,
    payload: OrderEdit,
) -> Result<OrderWithItems, AppError> {
    let order = orders::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;

    if order.user_id != user.id && user.role != Role::Admin {
        return Err(AppError::forbidden("Not your order"));
    }
    if order.status != OrderStatus::Placed {
        return Err(AppError::conflict(
            "Order can only be edited while still placed",
        ));
    }

    let total = validate_items(pool, &payload.items).await?;

    orders::replace_items(
        pool,
        order_id,
        total,
        &payload.items,
        payload.special_instructions.as_deref(),
    )
    .await?;

    tracing::info!(order_id, user_id = user.id, total, "Order edited");

    orders::with_items(pool, order_id)
        .await?
        .ok_or_else(|| AppError::internal("Order vanished after edit"))
}

/// Move an order through its lifecycle.
///
/// Staff may apply any legal transition; the owner may only cancel an order
/// that is still placed. After the write commits, the owner gets a push
/// frame plus a durable notification row as the offline fallback.
pub async fn update_status(
    pool: &SqlitePool,
    registry: &ConnectionRegistry,
    user: &CurrentUser,
    order_id: i64,
    new_status: OrderStatus,
) -> Result<Order, AppError> {
    let order = orders::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;

    if !user.role.is_staff() {
        let owner_cancel = order.user_id == user.id && new_status == OrderStatus::Cancelled;
        if !owner_cancel {
            return Err(AppError::forbidden("Only staff can update order status"));
        }
    }

    if !order.status.can_transition_to(new_status) {
        return Err(AppError::conflict(format!(
            "Cannot move order from {} to {new_status}",
            order.status
        )));
    }

    let updated = orders::set_status(pool, order_id, order.status, new_status).await?;

    tracing::info!(order_id, from = %order.status, to = %new_status, "Order status changed");

    notifications::create(
        pool,
        &NotificationCreate {
            user_id: updated.user_id,
            title: "Order update".into(),
            message: format!("Your order is now {new_status}"),
            kind: NotificationType::Order,
            related_item_id: None,
            expires_at: None,
        },
    )
    .await?;

    let items = orders::items_of(pool, order_id).await?;
    registry.send_to_user(
        updated.user_id,
        &PushMessage::OrderUpdate {
            order: OrderUpdatePayload {
                id: updated.id,
                status: new_status.to_string(),
                items: items
                    .iter()
                    .map(|i| PushOrderLine {
                        name: i.menu_item_name.clone(),
                        quantity: i.quantity,
                    })
                    .collect(),
            },
        },
    );

    Ok(updated)
}

/// Result of a payment confirmation
#[derive(Debug, Serialize)]
pub struct PaymentConfirmation {
    pub order_id: i64,
    pub points_awarded: i64,
    /// false when this order had already been credited
    pub newly_credited: bool,
    pub loyalty_points: i64,
}

/// Credit loyalty points for a paid order. Safe to call more than once per
/// order; duplicate confirmations leave the balance untouched.
pub async fn confirm_payment(
    pool: &SqlitePool,
    user: &CurrentUser,
    order_id: i64,
) -> Result<PaymentConfirmation, AppError> {
    let order = orders::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;
    if order.user_id != user.id {
        return Err(AppError::forbidden("Not your order"));
    }

    let points = points_for(order.total_amount);
    let newly_credited = loyalty::award_once(pool, order_id, order.user_id, points).await?;
    let balance = users::loyalty_points(pool, order.user_id).await?;

    if newly_credited {
        tracing::info!(order_id, user_id = order.user_id, points, "Loyalty points credited");
    } else {
        tracing::debug!(order_id, "Duplicate payment confirmation, no points credited");
    }

    Ok(PaymentConfirmation {
        order_id,
        points_awarded: if newly_credited { points } else { 0 },
        newly_credited,
        loyalty_points: balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_ten_percent_floored() {
        assert_eq!(points_for(199.0), 19);
        assert_eq!(points_for(190.0), 19);
        assert_eq!(points_for(9.0), 0);
        assert_eq!(points_for(0.0), 0);
    }
}
