//! JWT issue/verify

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::models::Role;

use super::CurrentUser;
use crate::error::AppError;

const JWT_EXPIRY_HOURS: i64 = 24;

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id (stringified i64)
    pub sub: String,
    /// Display name
    pub name: String,
    /// Role at issue time
    pub role: Role,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Token signing/verification service
#[derive(Clone)]
pub struct JwtService {
    secret: String,
}

impl JwtService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    /// Create a token for a logged-in user
    pub fn create_token(&self, user_id: i64, name: &str, role: Role) -> Result<String, AppError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            name: name.to_string(),
            role,
            exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::internal(format!("Token creation failed: {e}")))
    }

    /// Verify a token and return the caller identity
    pub fn verify(&self, token: &str) -> Result<CurrentUser, AppError> {
        let token_data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => {
                tracing::debug!("JWT validation failed: {e}");
                AppError::InvalidToken
            }
        })?;

        let id = token_data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::InvalidToken)?;

        Ok(CurrentUser {
            id,
            name: token_data.claims.name,
            role: token_data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_token() {
        let svc = JwtService::new("test-secret");
        let token = svc.create_token(42, "Asha", Role::Student).unwrap();
        let user = svc.verify(&token).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.role, Role::Student);
    }

    #[test]
    fn wrong_secret_rejected() {
        let svc = JwtService::new("secret-a");
        let token = svc.create_token(1, "x", Role::Admin).unwrap();
        let other = JwtService::new("secret-b");
        assert!(matches!(other.verify(&token), Err(AppError::InvalidToken)));
    }
}
