//! Notification endpoints

use axum::extract::{Path, State};
use axum::Extension;
use shared::models::Notification;

use crate::auth::CurrentUser;
use crate::db::repository::notifications;
use crate::error::{ok, ApiResult};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Vec<Notification>> {
    let rows = notifications::find_by_user(&state.pool, current.id).await?;
    Ok(ok(rows))
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Notification> {
    let notification = notifications::mark_read(&state.pool, id, current.id).await?;
    Ok(ok(notification))
}
