//! Category endpoints

use axum::extract::State;
use axum::{Extension, Json};
use shared::models::{Category, CategoryCreate, Role};

use crate::auth::CurrentUser;
use crate::db::repository::categories;
use crate::error::{ok, ApiResult, AppError};
use crate::state::AppState;

/// GET /api/categories
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let rows = categories::find_all(&state.pool).await?;
    Ok(ok(rows))
}

/// POST /api/admin/categories
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CategoryCreate>,
) -> ApiResult<Category> {
    match current.role {
        Role::Admin => {}
        Role::Student | Role::Kitchen => {
            return Err(AppError::forbidden("Only admins can manage categories"));
        }
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Category name must not be empty"));
    }
    let category = categories::create(&state.pool, payload).await?;
    Ok(ok(category))
}
