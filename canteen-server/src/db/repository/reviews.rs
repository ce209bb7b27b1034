//! Review Repository

use shared::models::Review;
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::{menu_items, RepoError, RepoResult};

pub async fn find_by_menu_item(pool: &SqlitePool, menu_item_id: i64) -> RepoResult<Vec<Review>> {
    let rows = sqlx::query_as::<_, Review>(
        "SELECT id, user_id, menu_item_id, rating, comment, created_at FROM reviews \
         WHERE menu_item_id = ? ORDER BY created_at DESC",
    )
    .bind(menu_item_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert a review and refresh the item's derived rating aggregate
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    menu_item_id: i64,
    rating: i64,
    comment: Option<&str>,
) -> RepoResult<Review> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO reviews (id, user_id, menu_item_id, rating, comment, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(menu_item_id)
    .bind(rating)
    .bind(comment)
    .bind(now_millis())
    .execute(pool)
    .await?;

    menu_items::refresh_rating(pool, menu_item_id).await?;

    let row = sqlx::query_as::<_, Review>(
        "SELECT id, user_id, menu_item_id, rating, comment, created_at FROM reviews WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| RepoError::Database("Failed to create review".into()))
}
