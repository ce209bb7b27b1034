//! User Repository

use shared::models::{Role, User};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const USER_SELECT: &str =
    "SELECT id, username, password_hash, name, email, role, loyalty_points FROM users";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_role(pool: &SqlitePool, role: Role) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} WHERE role = ?");
    let rows = sqlx::query_as::<_, User>(&sql)
        .bind(role)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    name: &str,
    email: &str,
    role: Role,
) -> RepoResult<User> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO users (id, username, password_hash, name, email, role, loyalty_points) \
         VALUES (?, ?, ?, ?, ?, ?, 0)",
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .bind(name)
    .bind(email)
    .bind(role)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!("Username {username} taken")),
        other => other,
    })?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Current loyalty point balance
pub async fn loyalty_points(pool: &SqlitePool, user_id: i64) -> RepoResult<i64> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT loyalty_points FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    row.map(|(p,)| p)
        .ok_or_else(|| RepoError::NotFound(format!("User {user_id} not found")))
}

/// Add points to a user's balance, returning the new balance.
/// `points` must be non-negative; the balance has no upper bound.
pub async fn add_loyalty_points(pool: &SqlitePool, user_id: i64, points: i64) -> RepoResult<i64> {
    if points < 0 {
        return Err(RepoError::Validation("Points must be non-negative".into()));
    }
    let rows = sqlx::query("UPDATE users SET loyalty_points = loyalty_points + ? WHERE id = ?")
        .bind(points)
        .bind(user_id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {user_id} not found")));
    }
    loyalty_points(pool, user_id).await
}

pub async fn count_by_role(pool: &SqlitePool, role: Role) -> RepoResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = ?")
        .bind(role)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
