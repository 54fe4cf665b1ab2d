//! Product Repository

use super::{RepoError, RepoResult};
use crate::utils::EntityKind;
use shared::models::{Product, ProductCreate, ProductUpdate};
use sqlx::SqliteExecutor;

const SELECT_PRODUCT: &str = "SELECT id, name, price, description, carbon_emission, image_url, \
                              flavour_type, category_id, merchant_id FROM product";

const RETURNING_PRODUCT: &str = "RETURNING id, name, price, description, carbon_emission, \
                                 image_url, flavour_type, category_id, merchant_id";

pub async fn find_all(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<Product>> {
    let sql = format!("{SELECT_PRODUCT} ORDER BY id");
    let products = sqlx::query_as::<_, Product>(&sql).fetch_all(exec).await?;
    Ok(products)
}

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{SELECT_PRODUCT} WHERE id = ?");
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(product)
}

/// Find product by id, returning `NotFound(Product)` otherwise
pub async fn require(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Product> {
    find_by_id(exec, id)
        .await?
        .ok_or(RepoError::NotFound(EntityKind::Product))
}

/// Products of a merchant, lowest emission first
pub async fn find_by_merchant(
    exec: impl SqliteExecutor<'_>,
    merchant_id: i64,
) -> RepoResult<Vec<Product>> {
    let sql = format!("{SELECT_PRODUCT} WHERE merchant_id = ? ORDER BY carbon_emission, id");
    let products = sqlx::query_as::<_, Product>(&sql)
        .bind(merchant_id)
        .fetch_all(exec)
        .await?;
    Ok(products)
}

/// Insert a product; emission starts at zero until ingredients are attached
pub async fn create(
    exec: impl SqliteExecutor<'_>,
    merchant_id: i64,
    data: ProductCreate,
) -> RepoResult<Product> {
    let sql = format!(
        "INSERT INTO product (name, price, description, carbon_emission, image_url, flavour_type, \
         category_id, merchant_id) VALUES (?, ?, ?, 0, ?, ?, ?, ?) {RETURNING_PRODUCT}"
    );
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(&data.name)
        .bind(data.price)
        .bind(&data.description)
        .bind(&data.image_url)
        .bind(&data.flavour_type)
        .bind(data.category_id)
        .bind(merchant_id)
        .fetch_one(exec)
        .await?;
    Ok(product)
}

/// Apply a partial update; the stored emission is never touched here
pub async fn update(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    data: ProductUpdate,
) -> RepoResult<Product> {
    let sql = format!(
        "UPDATE product SET \
           name = COALESCE(?, name), \
           price = COALESCE(?, price), \
           description = COALESCE(?, description), \
           image_url = COALESCE(?, image_url), \
           flavour_type = COALESCE(?, flavour_type), \
           category_id = COALESCE(?, category_id) \
         WHERE id = ? {RETURNING_PRODUCT}"
    );
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(&data.name)
        .bind(data.price)
        .bind(&data.description)
        .bind(&data.image_url)
        .bind(&data.flavour_type)
        .bind(data.category_id)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    product.ok_or(RepoError::NotFound(EntityKind::Product))
}

pub async fn update_carbon_emission(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    emission: f64,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE product SET carbon_emission = ? WHERE id = ?")
        .bind(emission)
        .bind(id)
        .execute(exec)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(RepoError::NotFound(EntityKind::Product));
    }
    Ok(())
}

pub async fn update_image_url(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    image_url: &str,
) -> RepoResult<Product> {
    let sql = format!("UPDATE product SET image_url = ? WHERE id = ? {RETURNING_PRODUCT}");
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(image_url)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    product.ok_or(RepoError::NotFound(EntityKind::Product))
}

/// Delete a product; associations and promotion links cascade, order lines are unlinked
pub async fn delete(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(exec)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(RepoError::NotFound(EntityKind::Product));
    }
    Ok(())
}

/// Ids of every product owned by the merchant
pub async fn owned_ids(
    exec: impl SqliteExecutor<'_>,
    merchant_id: i64,
) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM product WHERE merchant_id = ?")
        .bind(merchant_id)
        .fetch_all(exec)
        .await?;
    Ok(ids)
}
