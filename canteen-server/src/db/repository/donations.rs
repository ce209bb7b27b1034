//! Surplus Donation Repository

use shared::models::{DonationStatus, SurplusDonation, SurplusDonationCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const DONATION_SELECT: &str = "SELECT id, ngo_id, menu_item_id, quantity, donation_date, status, \
     notes FROM surplus_donations";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<SurplusDonation>> {
    let sql = format!("{DONATION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, SurplusDonation>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_ngo(pool: &SqlitePool, ngo_id: i64) -> RepoResult<Vec<SurplusDonation>> {
    let sql = format!("{DONATION_SELECT} WHERE ngo_id = ? ORDER BY donation_date DESC");
    let rows = sqlx::query_as::<_, SurplusDonation>(&sql)
        .bind(ngo_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Record the donation and decrement the item's surplus stock atomically.
///
/// The conditional UPDATE is the stock guard: it only matches while the item
/// is surplus-flagged with enough quantity left, so concurrent donations can
/// never drive the quantity negative — only enough succeed to exhaust stock
/// exactly. Hitting zero clears `is_surplus` in the same transaction.
pub async fn create(pool: &SqlitePool, data: &SurplusDonationCreate) -> RepoResult<SurplusDonation> {
    let id = snowflake_id();

    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE menu_items SET surplus_quantity = surplus_quantity - ?1 \
         WHERE id = ?2 AND is_surplus = 1 AND surplus_quantity >= ?1",
    )
    .bind(data.quantity)
    .bind(data.menu_item_id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(
            "Insufficient surplus quantity for donation".into(),
        ));
    }

    sqlx::query("UPDATE menu_items SET is_surplus = 0 WHERE id = ? AND surplus_quantity = 0")
        .bind(data.menu_item_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO surplus_donations (id, ngo_id, menu_item_id, quantity, donation_date, \
         status, notes) VALUES (?, ?, ?, ?, ?, 'scheduled', ?)",
    )
    .bind(id)
    .bind(data.ngo_id)
    .bind(data.menu_item_id)
    .bind(data.quantity)
    .bind(now_millis())
    .bind(&data.notes)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create donation".into()))
}

/// Persist a status move; the `WHERE status = ?` guard keeps it race-free
pub async fn set_status(
    pool: &SqlitePool,
    id: i64,
    from: DonationStatus,
    to: DonationStatus,
) -> RepoResult<SurplusDonation> {
    let rows = sqlx::query("UPDATE surplus_donations SET status = ? WHERE id = ? AND status = ?")
        .bind(to)
        .bind(id)
        .bind(from)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Donation {id} changed state concurrently"
        )));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Donation {id} not found")))
}
