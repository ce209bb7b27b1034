//! NGO Partner Repository

use shared::models::{NgoPartner, NgoPartnerCreate, NgoPartnerUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const NGO_SELECT: &str = "SELECT id, name, description, contact_name, contact_email, \
     contact_phone, address, is_active, created_at FROM ngo_partners";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<NgoPartner>> {
    let sql = format!("{NGO_SELECT} ORDER BY name");
    let rows = sqlx::query_as::<_, NgoPartner>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<NgoPartner>> {
    let sql = format!("{NGO_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, NgoPartner>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: NgoPartnerCreate) -> RepoResult<NgoPartner> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO ngo_partners (id, name, description, contact_name, contact_email, \
         contact_phone, address, is_active, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.contact_name)
    .bind(&data.contact_email)
    .bind(&data.contact_phone)
    .bind(&data.address)
    .bind(data.is_active)
    .bind(now_millis())
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create NGO partner".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: NgoPartnerUpdate) -> RepoResult<NgoPartner> {
    let rows = sqlx::query(
        "UPDATE ngo_partners SET name = COALESCE(?1, name), \
         description = COALESCE(?2, description), contact_name = COALESCE(?3, contact_name), \
         contact_email = COALESCE(?4, contact_email), contact_phone = COALESCE(?5, contact_phone), \
         address = COALESCE(?6, address), is_active = COALESCE(?7, is_active) WHERE id = ?8",
    )
    .bind(data.name)
    .bind(data.description)
    .bind(data.contact_name)
    .bind(data.contact_email)
    .bind(data.contact_phone)
    .bind(data.address)
    .bind(data.is_active)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("NGO partner {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("NGO partner {id} not found")))
}
