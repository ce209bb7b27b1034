//! Menu Item Repository

use shared::models::{
    Category, MenuItem, MenuItemCreate, MenuItemUpdate, MenuItemWithCategory, SurplusMark,
};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const ITEM_SELECT: &str = "SELECT id, name, description, price, image, category_id, is_available, \
     rating, review_count, is_surplus, surplus_price, surplus_expiry_time, surplus_quantity \
     FROM menu_items";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let rows = sqlx::query_as::<_, MenuItem>(ITEM_SELECT).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuItem>> {
    let sql = format!("{ITEM_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// All items joined with their categories, for the menu page
pub async fn find_all_with_categories(pool: &SqlitePool) -> RepoResult<Vec<MenuItemWithCategory>> {
    #[derive(sqlx::FromRow)]
    struct Row {
        #[sqlx(flatten)]
        item: MenuItem,
        category_name: String,
    }

    let rows = sqlx::query_as::<_, Row>(
        "SELECT m.id, m.name, m.description, m.price, m.image, m.category_id, m.is_available, \
         m.rating, m.review_count, m.is_surplus, m.surplus_price, m.surplus_expiry_time, \
         m.surplus_quantity, c.name AS category_name \
         FROM menu_items m JOIN categories c ON m.category_id = c.id \
         ORDER BY c.name, m.name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| MenuItemWithCategory {
            category: Category {
                id: r.item.category_id,
                name: r.category_name,
            },
            item: r.item,
        })
        .collect())
}

pub async fn create(pool: &SqlitePool, data: MenuItemCreate) -> RepoResult<MenuItem> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO menu_items (id, name, description, price, image, category_id, is_available) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.image)
    .bind(data.category_id)
    .bind(data.is_available)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu item".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: MenuItemUpdate) -> RepoResult<MenuItem> {
    let rows = sqlx::query(
        "UPDATE menu_items SET name = COALESCE(?1, name), description = COALESCE(?2, description), \
         price = COALESCE(?3, price), image = COALESCE(?4, image), \
         category_id = COALESCE(?5, category_id), is_available = COALESCE(?6, is_available) \
         WHERE id = ?7",
    )
    .bind(data.name)
    .bind(data.description)
    .bind(data.price)
    .bind(data.image)
    .bind(data.category_id)
    .bind(data.is_available)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM menu_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Set the four surplus fields in one statement
pub async fn mark_surplus(pool: &SqlitePool, id: i64, data: &SurplusMark) -> RepoResult<MenuItem> {
    let rows = sqlx::query(
        "UPDATE menu_items SET is_surplus = 1, surplus_price = ?, surplus_expiry_time = ?, \
         surplus_quantity = ? WHERE id = ?",
    )
    .bind(data.surplus_price)
    .bind(data.surplus_expiry_time)
    .bind(data.surplus_quantity)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu item {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu item {id} not found")))
}

/// Live surplus stock, soonest-expiring first so callers can prioritize it
pub async fn find_surplus(pool: &SqlitePool, now: i64) -> RepoResult<Vec<MenuItem>> {
    let sql = format!(
        "{ITEM_SELECT} WHERE is_surplus = 1 AND surplus_quantity > 0 AND surplus_expiry_time > ? \
         ORDER BY surplus_expiry_time ASC"
    );
    let rows = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(now)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Recompute the derived rating aggregate from reviews
pub async fn refresh_rating(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    sqlx::query(
        "UPDATE menu_items SET \
         rating = COALESCE((SELECT AVG(rating) FROM reviews WHERE menu_item_id = ?1), 0), \
         review_count = (SELECT COUNT(*) FROM reviews WHERE menu_item_id = ?1) \
         WHERE id = ?1",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn count_all(pool: &SqlitePool) -> RepoResult<(i64, i64)> {
    let (total, available): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(is_available), 0) FROM menu_items",
    )
    .fetch_one(pool)
    .await?;
    Ok((total, available))
}
