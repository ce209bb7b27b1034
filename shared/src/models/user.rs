//! User Model

use serde::{Deserialize, Serialize};

/// User role — closed set, checked exhaustively at every dispatch point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
    Kitchen,
}

impl Role {
    /// Staff roles may drive order and donation lifecycles
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Kitchen)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Admin => write!(f, "admin"),
            Role::Kitchen => write!(f, "kitchen"),
        }
    }
}

/// User entity. `password_hash` never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub loyalty_points: i64,
}

/// Public view of a user (login/register responses, order detail)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub loyalty_points: i64,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            name: u.name,
            email: u.email,
            role: u.role,
            loyalty_points: u.loyalty_points,
        }
    }
}

/// Create user payload (registration)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
}
