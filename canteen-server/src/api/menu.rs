//! Menu item endpoints

use axum::extract::{Path, State};
use axum::{Extension, Json};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate, MenuItemWithCategory, Role};

use crate::auth::CurrentUser;
use crate::db::repository::{categories, menu_items};
use crate::error::{ok, ApiResult, AppError};
use crate::state::AppState;

fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    match user.role {
        Role::Admin => Ok(()),
        Role::Student | Role::Kitchen => {
            Err(AppError::forbidden("Only admins can manage the menu"))
        }
    }
}

/// GET /api/menu
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<MenuItemWithCategory>> {
    let items = menu_items::find_all_with_categories(&state.pool).await?;
    Ok(ok(items))
}

/// GET /api/menu/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<MenuItem> {
    let item = menu_items::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {id} not found")))?;
    Ok(ok(item))
}

/// POST /api/admin/menu
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<MenuItemCreate>,
) -> ApiResult<MenuItem> {
    require_admin(&current)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Menu item name must not be empty"));
    }
    if payload.price <= 0.0 {
        return Err(AppError::validation("Price must be positive"));
    }
    if categories::find_by_id(&state.pool, payload.category_id).await?.is_none() {
        return Err(AppError::not_found(format!(
            "Category {} not found",
            payload.category_id
        )));
    }
    let item = menu_items::create(&state.pool, payload).await?;
    Ok(ok(item))
}

/// PUT /api/admin/menu/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> ApiResult<MenuItem> {
    require_admin(&current)?;
    if let Some(price) = payload.price {
        if price <= 0.0 {
            return Err(AppError::validation("Price must be positive"));
        }
    }
    if let Some(category_id) = payload.category_id {
        if categories::find_by_id(&state.pool, category_id).await?.is_none() {
            return Err(AppError::not_found(format!("Category {category_id} not found")));
        }
    }
    let item = menu_items::update(&state.pool, id, payload).await?;
    Ok(ok(item))
}

/// DELETE /api/admin/menu/{id}
pub async fn remove(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    require_admin(&current)?;
    if !menu_items::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Menu item {id} not found")));
    }
    Ok(ok(true))
}
