//! Customer Repository

use super::{ACCOUNT_UNIQUE_COLUMNS, RepoError, RepoResult, map_unique_column};
use crate::utils::EntityKind;
use shared::models::{Customer, CustomerCreate, CustomerUpdate};
use shared::util::now_millis;
use sqlx::SqliteExecutor;

const SELECT_CUSTOMER: &str =
    "SELECT id, username, email, first_name, last_name, green_points, created_at FROM customer";

pub async fn find_all(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<Customer>> {
    let sql = format!("{SELECT_CUSTOMER} ORDER BY id");
    let customers = sqlx::query_as::<_, Customer>(&sql).fetch_all(exec).await?;
    Ok(customers)
}

pub async fn find_by_username(
    exec: impl SqliteExecutor<'_>,
    username: &str,
) -> RepoResult<Option<Customer>> {
    let sql = format!("{SELECT_CUSTOMER} WHERE username = ? LIMIT 1");
    let customer = sqlx::query_as::<_, Customer>(&sql)
        .bind(username)
        .fetch_optional(exec)
        .await?;
    Ok(customer)
}

/// Find customer by username, returning `NotFound(Customer)` otherwise
pub async fn require_by_username(
    exec: impl SqliteExecutor<'_>,
    username: &str,
) -> RepoResult<Customer> {
    find_by_username(exec, username)
        .await?
        .ok_or(RepoError::NotFound(EntityKind::Customer))
}

pub async fn find_by_email(
    exec: impl SqliteExecutor<'_>,
    email: &str,
) -> RepoResult<Option<Customer>> {
    let sql = format!("{SELECT_CUSTOMER} WHERE email = ? LIMIT 1");
    let customer = sqlx::query_as::<_, Customer>(&sql)
        .bind(email)
        .fetch_optional(exec)
        .await?;
    Ok(customer)
}

/// Whether any customer or merchant already uses this username
pub async fn username_taken(exec: impl SqliteExecutor<'_>, username: &str) -> RepoResult<bool> {
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM customer WHERE username = ?1) \
             OR EXISTS (SELECT 1 FROM merchant WHERE username = ?1)",
    )
    .bind(username)
    .fetch_one(exec)
    .await?;
    Ok(taken)
}

pub async fn create(exec: impl SqliteExecutor<'_>, data: CustomerCreate) -> RepoResult<Customer> {
    let sql = "INSERT INTO customer (username, email, first_name, last_name, created_at) \
               VALUES (?, ?, ?, ?, ?) \
               RETURNING id, username, email, first_name, last_name, green_points, created_at";
    let customer = sqlx::query_as::<_, Customer>(sql)
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(now_millis())
        .fetch_one(exec)
        .await
        .map_err(map_unique_column(ACCOUNT_UNIQUE_COLUMNS, EntityKind::Email))?;
    Ok(customer)
}

/// Apply a partial update; absent fields keep their current value
pub async fn update(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    data: CustomerUpdate,
) -> RepoResult<Customer> {
    let sql = "UPDATE customer SET \
                 username = COALESCE(?, username), \
                 email = COALESCE(?, email), \
                 first_name = COALESCE(?, first_name), \
                 last_name = COALESCE(?, last_name) \
               WHERE id = ? \
               RETURNING id, username, email, first_name, last_name, green_points, created_at";
    let customer = sqlx::query_as::<_, Customer>(sql)
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(id)
        .fetch_optional(exec)
        .await
        .map_err(map_unique_column(ACCOUNT_UNIQUE_COLUMNS, EntityKind::Email))?;
    customer.ok_or(RepoError::NotFound(EntityKind::Customer))
}

pub async fn delete(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM customer WHERE id = ?")
        .bind(id)
        .execute(exec)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(RepoError::NotFound(EntityKind::Customer));
    }
    Ok(())
}
