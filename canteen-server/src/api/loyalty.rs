//! Loyalty endpoints

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use shared::models::{
    LoyaltyReward, LoyaltyRewardCreate, LoyaltyRewardUpdate, RewardRedemption, Role,
};

use crate::auth::CurrentUser;
use crate::db::repository::loyalty as loyalty_repo;
use crate::error::{ok, ApiResult, AppError};
use crate::services;
use crate::state::AppState;

fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    match user.role {
        Role::Admin => Ok(()),
        Role::Student | Role::Kitchen => {
            Err(AppError::forbidden("Only admins can manage rewards"))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PointsResponse {
    pub loyalty_points: i64,
}

/// GET /api/loyalty/points
pub async fn points(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<PointsResponse> {
    let balance = services::loyalty::points(&state.pool, current.id).await?;
    Ok(ok(PointsResponse {
        loyalty_points: balance,
    }))
}

/// GET /api/loyalty/rewards
pub async fn list_rewards(State(state): State<AppState>) -> ApiResult<Vec<LoyaltyReward>> {
    let rewards = loyalty_repo::find_rewards(&state.pool).await?;
    Ok(ok(rewards))
}

/// POST /api/admin/rewards
pub async fn create_reward(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<LoyaltyRewardCreate>,
) -> ApiResult<LoyaltyReward> {
    require_admin(&current)?;
    if payload.points_required < 1 {
        return Err(AppError::validation("Points required must be at least 1"));
    }
    let reward = loyalty_repo::create_reward(&state.pool, payload).await?;
    Ok(ok(reward))
}

/// PUT /api/admin/rewards/{id}
pub async fn update_reward(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<LoyaltyRewardUpdate>,
) -> ApiResult<LoyaltyReward> {
    require_admin(&current)?;
    if let Some(points) = payload.points_required {
        if points < 1 {
            return Err(AppError::validation("Points required must be at least 1"));
        }
    }
    let reward = loyalty_repo::update_reward(&state.pool, id, payload).await?;
    Ok(ok(reward))
}

#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub reward_id: i64,
}

/// POST /api/loyalty/redeem
pub async fn redeem(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<RedeemRequest>,
) -> ApiResult<RewardRedemption> {
    let redemption = services::loyalty::redeem(&state.pool, &current, req.reward_id).await?;
    Ok(ok(redemption))
}

/// GET /api/loyalty/redemptions
pub async fn redemptions(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Vec<RewardRedemption>> {
    let rows = services::loyalty::redemptions(&state.pool, current.id).await?;
    Ok(ok(rows))
}
