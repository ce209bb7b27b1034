//! Payment endpoints
//!
//! Two-step flow: create a gateway order, then confirm once the client has
//! paid. Confirmation verifies with the gateway and credits loyalty points;
//! repeated confirmations are harmless.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::db::repository::orders;
use crate::error::{ok, ApiResult, AppError};
use crate::services;
use crate::services::orders::PaymentConfirmation;
use crate::services::payment::PaymentOrder;
use crate::state::AppState;

/// POST /api/orders/{id}/payment
pub async fn create_order(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<PaymentOrder> {
    let order = orders::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    if order.user_id != current.id {
        return Err(AppError::forbidden("Not your order"));
    }

    let payment = state
        .payment
        .create_order(order.total_amount, &format!("order_{id}"))
        .await?;
    Ok(ok(payment))
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub payment_id: String,
}

/// POST /api/orders/{id}/payment/confirm
pub async fn confirm(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(req): Json<ConfirmRequest>,
) -> ApiResult<PaymentConfirmation> {
    if !state.payment.verify(&req.payment_id).await? {
        return Err(AppError::conflict("Payment is not settled yet"));
    }

    let confirmation = services::orders::confirm_payment(&state.pool, &current, id).await?;
    Ok(ok(confirmation))
}
