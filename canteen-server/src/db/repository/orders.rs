//! Order Repository
//!
//! `create` and `replace_items` are the two composite writes: order row and
//! line rows commit together or not at all.

use shared::models::{
    Order, OrderItemDetail, OrderItemRequest, OrderStatus, OrderWithItems, UserProfile,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::{users, RepoError, RepoResult};

const ORDER_SELECT: &str = "SELECT id, user_id, status, total_amount, created_at, is_preorder, \
     pickup_time, special_instructions FROM orders";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Order>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE user_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn items_of(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItemDetail>> {
    let rows = sqlx::query_as::<_, OrderItemDetail>(
        "SELECT oi.id, oi.order_id, oi.menu_item_id, oi.quantity, oi.price, \
         m.name AS menu_item_name \
         FROM order_items oi JOIN menu_items m ON oi.menu_item_id = m.id \
         WHERE oi.order_id = ?",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Order joined with its lines and the owning user
pub async fn with_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Option<OrderWithItems>> {
    let Some(order) = find_by_id(pool, order_id).await? else {
        return Ok(None);
    };
    let items = items_of(pool, order_id).await?;
    let user = users::find_by_id(pool, order.user_id)
        .await?
        .ok_or_else(|| RepoError::Database(format!("Order {order_id} owner missing")))?;
    Ok(Some(OrderWithItems {
        order,
        items,
        user: UserProfile::from(user),
    }))
}

/// Atomically insert the order and all its lines
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    total_amount: f64,
    items: &[OrderItemRequest],
    is_preorder: bool,
    pickup_time: Option<i64>,
    special_instructions: Option<&str>,
) -> RepoResult<Order> {
    let id = snowflake_id();
    let now = now_millis();

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO orders (id, user_id, status, total_amount, created_at, is_preorder, \
         pickup_time, special_instructions) VALUES (?, ?, 'placed', ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(total_amount)
    .bind(now)
    .bind(is_preorder)
    .bind(pickup_time)
    .bind(special_instructions)
    .execute(&mut *tx)
    .await?;

    for item in items {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, menu_item_id, quantity, price) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(snowflake_id())
        .bind(id)
        .bind(item.menu_item_id)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Replace the full item list and recomputed total; caller has already
/// verified the order is editable
pub async fn replace_items(
    pool: &SqlitePool,
    order_id: i64,
    total_amount: f64,
    items: &[OrderItemRequest],
    special_instructions: Option<&str>,
) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE orders SET total_amount = ?, \
         special_instructions = COALESCE(?, special_instructions) \
         WHERE id = ? AND status = 'placed'",
    )
    .bind(total_amount)
    .bind(special_instructions)
    .bind(order_id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Order {order_id} is no longer editable"
        )));
    }

    sqlx::query("DELETE FROM order_items WHERE order_id = ?")
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

    for item in items {
        sqlx::query(
            "INSERT INTO order_items (id, order_id, menu_item_id, quantity, price) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(snowflake_id())
        .bind(order_id)
        .bind(item.menu_item_id)
        .bind(item.quantity)
        .bind(item.price)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Persist a status change. Transition legality is the service's job; the
/// `WHERE status = ?` guard makes the check-then-write race-free.
pub async fn set_status(
    pool: &SqlitePool,
    order_id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<Order> {
    let rows = sqlx::query("UPDATE orders SET status = ? WHERE id = ? AND status = ?")
        .bind(to)
        .bind(order_id)
        .bind(from)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Order {order_id} changed state concurrently"
        )));
    }
    find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {order_id} not found")))
}

/// Aggregates for the admin dashboard
#[derive(Debug, sqlx::FromRow)]
pub struct OrderStats {
    pub today_orders: i64,
    pub today_revenue: f64,
    pub active_orders: i64,
}

pub async fn stats_since(pool: &SqlitePool, today_start: i64) -> RepoResult<OrderStats> {
    let stats = sqlx::query_as::<_, OrderStats>(
        "SELECT \
         COUNT(CASE WHEN created_at >= ?1 THEN 1 END) AS today_orders, \
         COALESCE(SUM(CASE WHEN created_at >= ?1 THEN total_amount END), 0) AS today_revenue, \
         COUNT(CASE WHEN status IN ('placed', 'preparing', 'ready') THEN 1 END) AS active_orders \
         FROM orders",
    )
    .bind(today_start)
    .fetch_one(pool)
    .await?;
    Ok(stats)
}
