//! Surplus food and donation endpoints

use axum::extract::{Path, State};
use axum::{Extension, Json};
use shared::models::{
    DonationStatus, MenuItem, SurplusDonation, SurplusDonationCreate, SurplusMark,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::{ok, ApiResult};
use crate::services;
use crate::state::AppState;

/// GET /api/surplus
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<MenuItem>> {
    let items = services::surplus::list_surplus(&state.pool).await?;
    Ok(ok(items))
}

/// POST /api/menu/{id}/surplus
pub async fn mark(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<SurplusMark>,
) -> ApiResult<MenuItem> {
    let item =
        services::surplus::mark_surplus(&state.pool, &state.registry, &current, id, payload)
            .await?;
    Ok(ok(item))
}

/// POST /api/donations
pub async fn create_donation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<SurplusDonationCreate>,
) -> ApiResult<SurplusDonation> {
    let donation = services::surplus::create_donation(&state.pool, &current, payload).await?;
    Ok(ok(donation))
}

#[derive(Debug, Deserialize)]
pub struct DonationStatusRequest {
    pub status: DonationStatus,
}

/// POST /api/donations/{id}/status
pub async fn update_donation_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(req): Json<DonationStatusRequest>,
) -> ApiResult<SurplusDonation> {
    let donation =
        services::surplus::update_donation_status(&state.pool, &current, id, req.status).await?;
    Ok(ok(donation))
}

/// GET /api/ngos/{id}/donations
pub async fn donations_by_ngo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<SurplusDonation>> {
    let rows = services::surplus::donations_by_ngo(&state.pool, id).await?;
    Ok(ok(rows))
}
