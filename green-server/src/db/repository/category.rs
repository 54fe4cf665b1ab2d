//! Category Repository

use super::{RepoError, RepoResult, map_unique};
use crate::utils::EntityKind;
use shared::models::{Category, CategoryCreate};
use sqlx::SqliteExecutor;

pub async fn find_all(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM category ORDER BY name")
        .fetch_all(exec)
        .await?;
    Ok(categories)
}

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>("SELECT id, name FROM category WHERE id = ?")
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(category)
}

pub async fn create(exec: impl SqliteExecutor<'_>, data: CategoryCreate) -> RepoResult<Category> {
    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO category (name) VALUES (?) RETURNING id, name",
    )
    .bind(&data.name)
    .fetch_one(exec)
    .await
    .map_err(map_unique(EntityKind::Category))?;
    Ok(category)
}

/// Ensure a category exists, returning `NotFound(Category)` otherwise
pub async fn require(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Category> {
    find_by_id(exec, id)
        .await?
        .ok_or(RepoError::NotFound(EntityKind::Category))
}
