//! Registration, login and session info

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use shared::models::{Role, UserCreate, UserProfile};

use crate::auth::{hash_password, verify_password, CurrentUser};
use crate::db::repository::users;
use crate::error::{ok, ApiResult, AppError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> ApiResult<AuthResponse> {
    if payload.username.trim().len() < 3 {
        return Err(AppError::validation("Username must be at least 3 characters"));
    }
    if payload.password.len() < 6 {
        return Err(AppError::validation("Password must be at least 6 characters"));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Name must not be empty"));
    }

    let role = payload.role.unwrap_or(Role::Student);
    let password_hash = hash_password(&payload.password)?;

    let user = users::create(
        &state.pool,
        payload.username.trim(),
        &password_hash,
        payload.name.trim(),
        &payload.email,
        role,
    )
    .await?;

    tracing::info!(user_id = user.id, %role, "User registered");

    let token = state.jwt.create_token(user.id, &user.name, user.role)?;
    Ok(ok(AuthResponse {
        token,
        user: UserProfile::from(user),
    }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let user = users::find_by_username(&state.pool, &req.username)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::invalid_credentials());
    }

    let token = state.jwt.create_token(user.id, &user.name, user.role)?;
    Ok(ok(AuthResponse {
        token,
        user: UserProfile::from(user),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<UserProfile> {
    let user = users::find_by_id(&state.pool, current.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(ok(UserProfile::from(user)))
}
