//! Promotion Repository
//!
//! A promotion belongs to one merchant and may be linked to any number of
//! that merchant's products through `promotion_product`.

use super::{RepoError, RepoResult, map_unique};
use crate::utils::EntityKind;
use shared::models::{Promotion, PromotionCreate, PromotionUpdate};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqliteExecutor};

const SELECT_PROMOTION: &str = "SELECT id, merchant_id, promocode, promo_value, url, valid_from, \
                                valid_until, created_at FROM promotion";

const RETURNING_PROMOTION: &str =
    "RETURNING id, merchant_id, promocode, promo_value, url, valid_from, valid_until, created_at";

pub async fn find_all(exec: impl SqliteExecutor<'_>) -> RepoResult<Vec<Promotion>> {
    let sql = format!("{SELECT_PROMOTION} ORDER BY id");
    let promotions = sqlx::query_as::<_, Promotion>(&sql).fetch_all(exec).await?;
    Ok(promotions)
}

pub async fn find_by_id(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Promotion>> {
    let sql = format!("{SELECT_PROMOTION} WHERE id = ?");
    let promotion = sqlx::query_as::<_, Promotion>(&sql)
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(promotion)
}

/// Find promotion by id, returning `NotFound(Promotion)` otherwise
pub async fn require(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Promotion> {
    find_by_id(exec, id)
        .await?
        .ok_or(RepoError::NotFound(EntityKind::Promotion))
}

pub async fn find_by_promocode(
    exec: impl SqliteExecutor<'_>,
    promocode: &str,
) -> RepoResult<Option<Promotion>> {
    let sql = format!("{SELECT_PROMOTION} WHERE promocode = ? LIMIT 1");
    let promotion = sqlx::query_as::<_, Promotion>(&sql)
        .bind(promocode)
        .fetch_optional(exec)
        .await?;
    Ok(promotion)
}

pub async fn find_by_merchant(
    exec: impl SqliteExecutor<'_>,
    merchant_id: i64,
) -> RepoResult<Vec<Promotion>> {
    let sql = format!("{SELECT_PROMOTION} WHERE merchant_id = ? ORDER BY id");
    let promotions = sqlx::query_as::<_, Promotion>(&sql)
        .bind(merchant_id)
        .fetch_all(exec)
        .await?;
    Ok(promotions)
}

pub async fn find_product_ids(
    exec: impl SqliteExecutor<'_>,
    promotion_id: i64,
) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT product_id FROM promotion_product WHERE promotion_id = ? ORDER BY product_id",
    )
    .bind(promotion_id)
    .fetch_all(exec)
    .await?;
    Ok(ids)
}

/// Insert a promotion together with its product links
pub async fn create(
    conn: &mut SqliteConnection,
    merchant_id: i64,
    data: PromotionCreate,
) -> RepoResult<Promotion> {
    let sql = format!(
        "INSERT INTO promotion (merchant_id, promocode, promo_value, url, valid_from, valid_until, \
         created_at) VALUES (?, ?, ?, ?, ?, ?, ?) {RETURNING_PROMOTION}"
    );
    let promotion = sqlx::query_as::<_, Promotion>(&sql)
        .bind(merchant_id)
        .bind(&data.promocode)
        .bind(data.promo_value)
        .bind(&data.url)
        .bind(data.valid_from)
        .bind(data.valid_until)
        .bind(now_millis())
        .fetch_one(&mut *conn)
        .await
        .map_err(map_unique(EntityKind::Promotion))?;

    replace_products(conn, promotion.id, &data.product_ids).await?;
    Ok(promotion)
}

/// Apply a partial update; `product_ids`, when present, replaces the links
///
/// The clear flags null the URL or window first; supplied values win.
pub async fn update(
    conn: &mut SqliteConnection,
    id: i64,
    data: PromotionUpdate,
) -> RepoResult<Promotion> {
    let sql = format!(
        "UPDATE promotion SET \
           promocode = COALESCE(?1, promocode), \
           promo_value = COALESCE(?2, promo_value), \
           url = COALESCE(?3, CASE WHEN ?6 THEN NULL ELSE url END), \
           valid_from = COALESCE(?4, CASE WHEN ?7 THEN NULL ELSE valid_from END), \
           valid_until = COALESCE(?5, CASE WHEN ?7 THEN NULL ELSE valid_until END) \
         WHERE id = ?8 {RETURNING_PROMOTION}"
    );
    let promotion = sqlx::query_as::<_, Promotion>(&sql)
        .bind(&data.promocode)
        .bind(data.promo_value)
        .bind(&data.url)
        .bind(data.valid_from)
        .bind(data.valid_until)
        .bind(data.clear_url)
        .bind(data.clear_window)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_unique(EntityKind::Promotion))?
        .ok_or(RepoError::NotFound(EntityKind::Promotion))?;

    if let Some(product_ids) = &data.product_ids {
        replace_products(conn, id, product_ids).await?;
    }
    Ok(promotion)
}

async fn replace_products(
    conn: &mut SqliteConnection,
    promotion_id: i64,
    product_ids: &[i64],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM promotion_product WHERE promotion_id = ?")
        .bind(promotion_id)
        .execute(&mut *conn)
        .await?;
    for product_id in product_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO promotion_product (promotion_id, product_id) VALUES (?, ?)",
        )
        .bind(promotion_id)
        .bind(product_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Delete a promotion; its product links cascade
pub async fn delete(exec: impl SqliteExecutor<'_>, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM promotion WHERE id = ?")
        .bind(id)
        .execute(exec)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(RepoError::NotFound(EntityKind::Promotion));
    }
    Ok(())
}
