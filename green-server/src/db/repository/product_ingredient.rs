//! Product-Ingredient Association Repository
//!
//! Rows are keyed by `(product_id, ingredient_id)`; reads join the
//! ingredient so callers get its name and per-gram emission.

use super::{RepoError, RepoResult};
use crate::utils::EntityKind;
use shared::models::ProductIngredient;
use sqlx::SqliteExecutor;

const SELECT_ASSOCIATION: &str = "SELECT pi.product_id, pi.ingredient_id, i.name AS ingredient_name, \
                                  i.emission_per_gram, pi.serving_qty \
                                  FROM product_ingredient pi \
                                  JOIN ingredient i ON i.id = pi.ingredient_id";

pub async fn find_all(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<ProductIngredient>> {
    let sql = format!("{SELECT_ASSOCIATION} ORDER BY pi.product_id, i.name");
    let rows = sqlx::query_as::<_, ProductIngredient>(&sql)
        .fetch_all(exec)
        .await?;
    Ok(rows)
}

pub async fn find_by_product(
    exec: impl SqliteExecutor<'_>,
    product_id: i64,
) -> RepoResult<Vec<ProductIngredient>> {
    let sql = format!("{SELECT_ASSOCIATION} WHERE pi.product_id = ? ORDER BY i.name");
    let rows = sqlx::query_as::<_, ProductIngredient>(&sql)
        .bind(product_id)
        .fetch_all(exec)
        .await?;
    Ok(rows)
}

pub async fn find(
    exec: impl SqliteExecutor<'_>,
    ingredient_id: i64,
    product_id: i64,
) -> RepoResult<Option<ProductIngredient>> {
    let sql = format!("{SELECT_ASSOCIATION} WHERE pi.product_id = ? AND pi.ingredient_id = ?");
    let row = sqlx::query_as::<_, ProductIngredient>(&sql)
        .bind(product_id)
        .bind(ingredient_id)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}

pub async fn exists(
    exec: impl SqliteExecutor<'_>,
    ingredient_id: i64,
    product_id: i64,
) -> RepoResult<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM product_ingredient WHERE product_id = ? AND ingredient_id = ?)",
    )
    .bind(product_id)
    .bind(ingredient_id)
    .fetch_one(exec)
    .await?;
    Ok(exists)
}

/// Insert or replace the serving quantity of an association
pub async fn save(exec: impl SqliteExecutor<'_>, association: &ProductIngredient) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO product_ingredient (product_id, ingredient_id, serving_qty) VALUES (?, ?, ?) \
         ON CONFLICT (product_id, ingredient_id) DO UPDATE SET serving_qty = excluded.serving_qty",
    )
    .bind(association.product_id)
    .bind(association.ingredient_id)
    .bind(association.serving_qty)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn delete(
    exec: impl SqliteExecutor<'_>,
    ingredient_id: i64,
    product_id: i64,
) -> RepoResult<()> {
    let rows =
        sqlx::query("DELETE FROM product_ingredient WHERE product_id = ? AND ingredient_id = ?")
            .bind(product_id)
            .bind(ingredient_id)
            .execute(exec)
            .await?
            .rows_affected();
    if rows == 0 {
        return Err(RepoError::NotFound(EntityKind::ProductIngredient));
    }
    Ok(())
}
