//! NGO partner endpoints

use axum::extract::{Path, State};
use axum::{Extension, Json};
use shared::models::{NgoPartner, NgoPartnerCreate, NgoPartnerUpdate, Role};

use crate::auth::CurrentUser;
use crate::db::repository::ngo_partners;
use crate::error::{ok, ApiResult, AppError};
use crate::state::AppState;

fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    match user.role {
        Role::Admin => Ok(()),
        Role::Student | Role::Kitchen => {
            Err(AppError::forbidden("Only admins can manage NGO partners"))
        }
    }
}

/// GET /api/ngos
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<NgoPartner>> {
    let rows = ngo_partners::find_all(&state.pool).await?;
    Ok(ok(rows))
}

/// GET /api/ngos/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<NgoPartner> {
    let ngo = ngo_partners::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("NGO partner {id} not found")))?;
    Ok(ok(ngo))
}

/// POST /api/admin/ngos
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<NgoPartnerCreate>,
) -> ApiResult<NgoPartner> {
    require_admin(&current)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("NGO name must not be empty"));
    }
    let ngo = ngo_partners::create(&state.pool, payload).await?;
    Ok(ok(ngo))
}

/// PUT /api/admin/ngos/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<NgoPartnerUpdate>,
) -> ApiResult<NgoPartner> {
    require_admin(&current)?;
    let ngo = ngo_partners::update(&state.pool, id, payload).await?;
    Ok(ok(ngo))
}
