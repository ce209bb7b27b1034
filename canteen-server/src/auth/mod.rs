//! Authentication: JWT bearer tokens + argon2 password hashing
//!
//! Every protected handler receives a [`CurrentUser`] extension inserted by
//! [`auth_middleware`]. The rest of the core trusts that identity and does
//! not re-verify it.

mod jwt;
mod password;

pub use jwt::{Claims, JwtService};
pub use password::{hash_password, verify_password};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::models::Role;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller identity
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub role: Role,
}

/// Middleware that extracts and verifies the bearer token
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::InvalidToken)?;

    let user = state.jwt.verify(token)?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
