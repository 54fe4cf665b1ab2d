//! Ingredient Repository

use super::{RepoResult, map_unique};
use crate::utils::EntityKind;
use shared::models::{Ingredient, IngredientCreate};
use sqlx::SqliteExecutor;

pub async fn find_all(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<Ingredient>> {
    let ingredients = sqlx::query_as::<_, Ingredient>(
        "SELECT id, name, emission_per_gram FROM ingredient ORDER BY name",
    )
    .fetch_all(exec)
    .await?;
    Ok(ingredients)
}

pub async fn find_by_name(
    exec: impl SqliteExecutor<'_>,
    name: &str,
) -> RepoResult<Option<Ingredient>> {
    let ingredient = sqlx::query_as::<_, Ingredient>(
        "SELECT id, name, emission_per_gram FROM ingredient WHERE name = ? LIMIT 1",
    )
    .bind(name)
    .fetch_optional(exec)
    .await?;
    Ok(ingredient)
}

pub async fn create(exec: impl SqliteExecutor<'_>, data: IngredientCreate) -> RepoResult<Ingredient> {
    let ingredient = sqlx::query_as::<_, Ingredient>(
        "INSERT INTO ingredient (name, emission_per_gram) VALUES (?, ?) RETURNING id, name, emission_per_gram",
    )
    .bind(&data.name)
    .bind(data.emission_per_gram)
    .fetch_one(exec)
    .await
    .map_err(map_unique(EntityKind::Ingredient))?;
    Ok(ingredient)
}
