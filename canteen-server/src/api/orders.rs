//! Order endpoints
//!
//! All logic lives in [`crate::services::orders`]; handlers only unpack the
//! request and the caller identity.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use shared::models::{Order, OrderCreate, OrderEdit, OrderStatus, OrderWithItems};

use crate::auth::CurrentUser;
use crate::error::{ok, ApiResult};
use crate::services;
use crate::state::AppState;

/// POST /api/orders
pub async fn place(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<OrderCreate>,
) -> ApiResult<OrderWithItems> {
    let order =
        services::orders::place(&state.pool, &state.registry, &current, payload).await?;
    Ok(ok(order))
}

/// GET /api/orders
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Vec<Order>> {
    let orders = services::orders::list_for(&state.pool, &current).await?;
    Ok(ok(orders))
}

/// GET /api/orders/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<OrderWithItems> {
    let order = services::orders::get(&state.pool, &current, id).await?;
    Ok(ok(order))
}

/// PUT /api/orders/{id}
pub async fn edit(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderEdit>,
) -> ApiResult<OrderWithItems> {
    let order = services::orders::edit(&state.pool, &current, id, payload).await?;
    Ok(ok(order))
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

/// POST /api/orders/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<Order> {
    let order = services::orders::update_status(
        &state.pool,
        &state.registry,
        &current,
        id,
        req.status,
    )
    .await?;
    Ok(ok(order))
}
