//! Review endpoints

use axum::extract::{Path, State};
use axum::{Extension, Json};
use shared::models::{Review, ReviewCreate};

use crate::auth::CurrentUser;
use crate::db::repository::{menu_items, reviews};
use crate::error::{ok, ApiResult, AppError};
use crate::state::AppState;

/// GET /api/menu/{id}/reviews
pub async fn list_for_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<Review>> {
    let rows = reviews::find_by_menu_item(&state.pool, id).await?;
    Ok(ok(rows))
}

/// POST /api/reviews
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<ReviewCreate>,
) -> ApiResult<Review> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::validation("Rating must be between 1 and 5"));
    }
    if menu_items::find_by_id(&state.pool, payload.menu_item_id).await?.is_none() {
        return Err(AppError::not_found(format!(
            "Menu item {} not found",
            payload.menu_item_id
        )));
    }

    let review = reviews::create(
        &state.pool,
        current.id,
        payload.menu_item_id,
        payload.rating,
        payload.comment.as_deref(),
    )
    .await?;
    Ok(ok(review))
}
