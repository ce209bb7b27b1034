//! Loyalty Repository
//!
//! Two operations here carry transactional guarantees:
//! - `redeem`: conditional debit + redemption insert in one transaction, so
//!   two concurrent redemptions can never both pass the balance check.
//! - `award_once`: the `loyalty_accruals.order_id` UNIQUE constraint makes
//!   payment-confirmation crediting idempotent per order.

use shared::models::{
    LoyaltyReward, LoyaltyRewardCreate, LoyaltyRewardUpdate, RewardRedemption,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const REWARD_SELECT: &str = "SELECT id, name, description, points_required, reward_type, \
     reward_value, is_active FROM loyalty_rewards";

// ── Rewards ──

pub async fn find_rewards(pool: &SqlitePool) -> RepoResult<Vec<LoyaltyReward>> {
    let sql = format!("{REWARD_SELECT} ORDER BY points_required");
    let rows = sqlx::query_as::<_, LoyaltyReward>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_reward_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<LoyaltyReward>> {
    let sql = format!("{REWARD_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, LoyaltyReward>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create_reward(pool: &SqlitePool, data: LoyaltyRewardCreate) -> RepoResult<LoyaltyReward> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO loyalty_rewards (id, name, description, points_required, reward_type, \
         reward_value, is_active) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.points_required)
    .bind(data.reward_type)
    .bind(&data.reward_value)
    .bind(data.is_active)
    .execute(pool)
    .await?;
    find_reward_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create reward".into()))
}

pub async fn update_reward(
    pool: &SqlitePool,
    id: i64,
    data: LoyaltyRewardUpdate,
) -> RepoResult<LoyaltyReward> {
    let rows = sqlx::query(
        "UPDATE loyalty_rewards SET name = COALESCE(?1, name), \
         description = COALESCE(?2, description), \
         points_required = COALESCE(?3, points_required), \
         reward_type = COALESCE(?4, reward_type), \
         reward_value = COALESCE(?5, reward_value), \
         is_active = COALESCE(?6, is_active) WHERE id = ?7",
    )
    .bind(data.name)
    .bind(data.description)
    .bind(data.points_required)
    .bind(data.reward_type)
    .bind(data.reward_value)
    .bind(data.is_active)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Reward {id} not found")));
    }
    find_reward_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reward {id} not found")))
}

// ── Redemptions ──

pub async fn find_redemptions_by_user(
    pool: &SqlitePool,
    user_id: i64,
) -> RepoResult<Vec<RewardRedemption>> {
    let rows = sqlx::query_as::<_, RewardRedemption>(
        "SELECT id, user_id, reward_id, points_used, status, redeemed_at \
         FROM reward_redemptions WHERE user_id = ? ORDER BY redeemed_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Debit the balance and record the redemption atomically.
///
/// The `loyalty_points >= ?` guard inside the UPDATE is the whole
/// concurrency story: whichever transaction runs second sees the already
/// debited balance and affects zero rows.
pub async fn redeem(
    pool: &SqlitePool,
    user_id: i64,
    reward_id: i64,
    points_used: i64,
) -> RepoResult<RewardRedemption> {
    let id = snowflake_id();
    let now = now_millis();

    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE users SET loyalty_points = loyalty_points - ?1 \
         WHERE id = ?2 AND loyalty_points >= ?1",
    )
    .bind(points_used)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::Conflict("Not enough points to redeem this reward".into()));
    }

    sqlx::query(
        "INSERT INTO reward_redemptions (id, user_id, reward_id, points_used, status, redeemed_at) \
         VALUES (?, ?, ?, ?, 'pending', ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(reward_id)
    .bind(points_used)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let row = sqlx::query_as::<_, RewardRedemption>(
        "SELECT id, user_id, reward_id, points_used, status, redeemed_at \
         FROM reward_redemptions WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| RepoError::Database("Failed to create redemption".into()))
}

// ── Accruals ──

/// Credit `points` for `order_id` exactly once. Returns `false` when the
/// order was already credited (duplicate confirmation callback).
pub async fn award_once(
    pool: &SqlitePool,
    order_id: i64,
    user_id: i64,
    points: i64,
) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "INSERT INTO loyalty_accruals (id, order_id, user_id, points, created_at) \
         VALUES (?, ?, ?, ?, ?) ON CONFLICT(order_id) DO NOTHING",
    )
    .bind(snowflake_id())
    .bind(order_id)
    .bind(user_id)
    .bind(points)
    .bind(now_millis())
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        // Already credited — leave the balance untouched
        tx.commit().await?;
        return Ok(false);
    }

    sqlx::query("UPDATE users SET loyalty_points = loyalty_points + ? WHERE id = ?")
        .bind(points)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}
