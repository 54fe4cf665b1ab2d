//! Promotion Service
//!
//! Promotions belong to a merchant and may be limited to some of that
//! merchant's products. Whether a promotion is active is derived from its
//! optional validity window at read time.

use shared::models::{Promotion, PromotionCreate, PromotionDetail, PromotionUpdate};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::db::repository::{merchant, product, promotion};
use crate::utils::{AppError, AppResult, EntityKind};

fn validate_promo_value(value: f64) -> AppResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::validation(format!(
            "promo_value must be a positive number, got {value}"
        )));
    }
    Ok(())
}

fn validate_window(valid_from: Option<i64>, valid_until: Option<i64>) -> AppResult<()> {
    if let (Some(from), Some(until)) = (valid_from, valid_until)
        && until <= from
    {
        return Err(AppError::validation(format!(
            "promotion must end after it starts (valid_from={from}, valid_until={until})"
        )));
    }
    Ok(())
}

/// Every listed product must exist and belong to the merchant
async fn check_products_owned(
    conn: &mut SqliteConnection,
    merchant_id: i64,
    product_ids: &[i64],
) -> AppResult<()> {
    if product_ids.is_empty() {
        return Ok(());
    }
    let owned = product::owned_ids(&mut *conn, merchant_id).await?;
    if product_ids.iter().any(|id| !owned.contains(id)) {
        return Err(AppError::NotFound(EntityKind::Product));
    }
    Ok(())
}

async fn detail(
    conn: &mut SqliteConnection,
    promo: Promotion,
    now: i64,
) -> AppResult<PromotionDetail> {
    let product_ids = promotion::find_product_ids(&mut *conn, promo.id).await?;
    let is_active = promo.is_active_at(now);
    Ok(PromotionDetail {
        promotion: promo,
        product_ids,
        is_active,
    })
}

async fn details(
    conn: &mut SqliteConnection,
    promotions: Vec<Promotion>,
) -> AppResult<Vec<PromotionDetail>> {
    let now = now_millis();
    let mut result = Vec::with_capacity(promotions.len());
    for p in promotions {
        result.push(detail(conn, p, now).await?);
    }
    Ok(result)
}

#[derive(Clone)]
pub struct PromotionService {
    pool: SqlitePool,
}

impl PromotionService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_all_promotions(&self) -> AppResult<Vec<PromotionDetail>> {
        let mut conn = self.pool.acquire().await?;
        let promotions = promotion::find_all(&mut *conn).await?;
        details(&mut conn, promotions).await
    }

    pub async fn get_promotion(&self, id: i64) -> AppResult<PromotionDetail> {
        let mut conn = self.pool.acquire().await?;
        let found = promotion::require(&mut *conn, id).await?;
        detail(&mut conn, found, now_millis()).await
    }

    pub async fn get_promotion_by_promocode(&self, promocode: &str) -> AppResult<PromotionDetail> {
        let mut conn = self.pool.acquire().await?;
        let found = promotion::find_by_promocode(&mut *conn, promocode)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Promotion))?;
        detail(&mut conn, found, now_millis()).await
    }

    pub async fn get_promotions_by_merchant(
        &self,
        merchant_username: &str,
    ) -> AppResult<Vec<PromotionDetail>> {
        let mut conn = self.pool.acquire().await?;
        let owner = merchant::require_by_username(&mut *conn, merchant_username).await?;
        let promotions = promotion::find_by_merchant(&mut *conn, owner.id).await?;
        details(&mut conn, promotions).await
    }

    pub async fn create_promotion(
        &self,
        merchant_username: &str,
        data: PromotionCreate,
    ) -> AppResult<PromotionDetail> {
        validate_promo_value(data.promo_value)?;
        validate_window(data.valid_from, data.valid_until)?;
        if data.promocode.trim().is_empty() {
            return Err(AppError::validation("promocode must not be empty"));
        }

        let mut tx = self.pool.begin().await?;
        let owner = merchant::require_by_username(&mut *tx, merchant_username).await?;
        if promotion::find_by_promocode(&mut *tx, &data.promocode)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(EntityKind::Promotion));
        }
        check_products_owned(&mut tx, owner.id, &data.product_ids).await?;

        let created = promotion::create(&mut tx, owner.id, data).await?;
        let result = detail(&mut tx, created, now_millis()).await?;
        tx.commit().await?;

        info!(
            promotion_id = result.promotion.id,
            promocode = %result.promotion.promocode,
            merchant = %owner.username,
            "Promotion created"
        );
        Ok(result)
    }

    pub async fn update_promotion(
        &self,
        id: i64,
        data: PromotionUpdate,
    ) -> AppResult<PromotionDetail> {
        if let Some(value) = data.promo_value {
            validate_promo_value(value)?;
        }

        let mut tx = self.pool.begin().await?;
        let existing = promotion::require(&mut *tx, id).await?;
        let (current_from, current_until) = if data.clear_window {
            (None, None)
        } else {
            (existing.valid_from, existing.valid_until)
        };
        validate_window(
            data.valid_from.or(current_from),
            data.valid_until.or(current_until),
        )?;

        if let Some(code) = &data.promocode
            && code != &existing.promocode
            && promotion::find_by_promocode(&mut *tx, code).await?.is_some()
        {
            return Err(AppError::AlreadyExists(EntityKind::Promotion));
        }
        if let Some(product_ids) = &data.product_ids {
            check_products_owned(&mut tx, existing.merchant_id, product_ids).await?;
        }

        let updated = promotion::update(&mut tx, id, data).await?;
        let result = detail(&mut tx, updated, now_millis()).await?;
        tx.commit().await?;

        info!(promotion_id = id, "Promotion updated");
        Ok(result)
    }

    pub async fn delete_promotion(&self, id: i64) -> AppResult<()> {
        promotion::delete(&self.pool, id).await?;
        info!(promotion_id = id, "Promotion deleted");
        Ok(())
    }
}
