//! Notification Repository

use shared::models::{Notification, NotificationCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const NOTIFICATION_SELECT: &str = "SELECT id, user_id, title, message, kind, is_read, created_at, \
     related_item_id, expires_at FROM notifications";

pub async fn create(pool: &SqlitePool, data: &NotificationCreate) -> RepoResult<Notification> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO notifications (id, user_id, title, message, kind, is_read, created_at, \
         related_item_id, expires_at) VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.user_id)
    .bind(&data.title)
    .bind(&data.message)
    .bind(data.kind)
    .bind(now_millis())
    .bind(data.related_item_id)
    .bind(data.expires_at)
    .execute(pool)
    .await?;

    let sql = format!("{NOTIFICATION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Notification>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.ok_or_else(|| RepoError::Database("Failed to create notification".into()))
}

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Notification>> {
    let sql = format!("{NOTIFICATION_SELECT} WHERE user_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Notification>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Mark read, scoped to the owner so users cannot touch others' rows
pub async fn mark_read(pool: &SqlitePool, id: i64, user_id: i64) -> RepoResult<Notification> {
    let rows = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Notification {id} not found")));
    }

    let sql = format!("{NOTIFICATION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Notification>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.ok_or_else(|| RepoError::NotFound(format!("Notification {id} not found")))
}

/// Garbage-collect expired rows; returns how many were removed
pub async fn delete_expired(pool: &SqlitePool, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query(
        "DELETE FROM notifications WHERE expires_at IS NOT NULL AND expires_at <= ?",
    )
    .bind(now)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}
