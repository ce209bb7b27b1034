//! Admin dashboard stats

use axum::extract::State;
use axum::Extension;
use serde::Serialize;
use shared::models::Role;
use shared::util::now_millis;

use crate::auth::CurrentUser;
use crate::db::repository::{menu_items, orders, users};
use crate::error::{ok, ApiResult, AppError};
use crate::state::AppState;

const DAY_MS: i64 = 86_400_000;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub today_orders: i64,
    pub today_revenue: f64,
    pub active_orders: i64,
    pub total_students: i64,
    pub total_menu_items: i64,
    pub available_menu_items: i64,
}

/// GET /api/admin/stats
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<DashboardStats> {
    match current.role {
        Role::Admin => {}
        Role::Student | Role::Kitchen => {
            return Err(AppError::forbidden("Only admins can view dashboard stats"));
        }
    }

    // UTC midnight
    let now = now_millis();
    let today_start = now - now % DAY_MS;

    let order_stats = orders::stats_since(&state.pool, today_start).await?;
    let total_students = users::count_by_role(&state.pool, Role::Student).await?;
    let (total_menu_items, available_menu_items) = menu_items::count_all(&state.pool).await?;

    Ok(ok(DashboardStats {
        today_orders: order_stats.today_orders,
        today_revenue: order_stats.today_revenue,
        active_orders: order_stats.active_orders,
        total_students,
        total_menu_items,
        available_menu_items,
    }))
}
