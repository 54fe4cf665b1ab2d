//! Merchant Repository

use super::{ACCOUNT_UNIQUE_COLUMNS, RepoError, RepoResult, map_unique_column};
use crate::utils::EntityKind;
use shared::models::{Merchant, MerchantCreate};
use shared::util::now_millis;
use sqlx::SqliteExecutor;

const SELECT_MERCHANT: &str =
    "SELECT id, username, email, company, logo_url, carbon_rating, created_at FROM merchant";

pub async fn find_all(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<Merchant>> {
    let sql = format!("{SELECT_MERCHANT} ORDER BY id");
    let merchants = sqlx::query_as::<_, Merchant>(&sql).fetch_all(exec).await?;
    Ok(merchants)
}

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Merchant>> {
    let sql = format!("{SELECT_MERCHANT} WHERE id = ?");
    let merchant = sqlx::query_as::<_, Merchant>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(merchant)
}

pub async fn find_by_username(
    exec: impl SqliteExecutor<'_>,
    username: &str,
) -> RepoResult<Option<Merchant>> {
    let sql = format!("{SELECT_MERCHANT} WHERE username = ? LIMIT 1");
    let merchant = sqlx::query_as::<_, Merchant>(&sql)
        .bind(username)
        .fetch_optional(exec)
        .await?;
    Ok(merchant)
}

/// Find merchant by username, returning `NotFound(Merchant)` otherwise
pub async fn require_by_username(
    exec: impl SqliteExecutor<'_>,
    username: &str,
) -> RepoResult<Merchant> {
    find_by_username(exec, username)
        .await?
        .ok_or(RepoError::NotFound(EntityKind::Merchant))
}

pub async fn create(exec: impl SqliteExecutor<'_>, data: MerchantCreate) -> RepoResult<Merchant> {
    let sql = "INSERT INTO merchant (username, email, company, logo_url, created_at) \
               VALUES (?, ?, ?, ?, ?) \
               RETURNING id, username, email, company, logo_url, carbon_rating, created_at";
    let merchant = sqlx::query_as::<_, Merchant>(sql)
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.company)
        .bind(&data.logo_url)
        .bind(now_millis())
        .fetch_one(exec)
        .await
        .map_err(map_unique_column(ACCOUNT_UNIQUE_COLUMNS, EntityKind::Email))?;
    Ok(merchant)
}

/// Store the derived carbon rating (`None` once the merchant has no products)
pub async fn update_carbon_rating(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    rating: Option<f64>,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE merchant SET carbon_rating = ? WHERE id = ?")
        .bind(rating)
        .bind(id)
        .execute(exec)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(RepoError::NotFound(EntityKind::Merchant));
    }
    Ok(())
}
