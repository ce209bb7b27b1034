//! Loyalty service
//!
//! Balances, reward redemption and redemption history. Crediting happens in
//! the order payment flow ([`crate::services::orders::confirm_payment`]).

use shared::models::{NotificationCreate, NotificationType, RewardRedemption};
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::db::repository::{loyalty, notifications, users};
use crate::error::AppError;

/// Current point balance
pub async fn points(pool: &SqlitePool, user_id: i64) -> Result<i64, AppError> {
    Ok(users::loyalty_points(pool, user_id).await?)
}

/// Redeem a reward against the caller's balance.
///
/// Insufficient points surface as a conflict and leave the balance
/// untouched; the debit and the redemption row commit together.
pub async fn redeem(
    pool: &SqlitePool,
    user: &CurrentUser,
    reward_id: i64,
) -> Result<RewardRedemption, AppError> {
    let reward = loyalty::find_reward_by_id(pool, reward_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Reward {reward_id} not found")))?;
    if !reward.is_active {
        return Err(AppError::validation(format!("Reward {} is not active", reward.name)));
    }

    let redemption = loyalty::redeem(pool, user.id, reward_id, reward.points_required).await?;

    tracing::info!(
        user_id = user.id,
        reward_id,
        points = reward.points_required,
        "Reward redeemed"
    );

    notifications::create(
        pool,
        &NotificationCreate {
            user_id: user.id,
            title: "Reward redeemed".into(),
            message: format!("You redeemed {} for {} points", reward.name, reward.points_required),
            kind: NotificationType::Reward,
            related_item_id: None,
            expires_at: None,
        },
    )
    .await?;

    Ok(redemption)
}

/// Redemption history, most recent first
pub async fn redemptions(pool: &SqlitePool, user_id: i64) -> Result<Vec<RewardRedemption>, AppError> {
    Ok(loyalty::find_redemptions_by_user(pool, user_id).await?)
}
