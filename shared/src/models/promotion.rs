//! Promotion Model

use serde::{Deserialize, Serialize};

/// Merchant promotion across selected products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Promotion {
    pub id: i64,
    pub merchant_id: i64,
    pub promocode: String,
    pub promo_value: f64,
    pub url: Option<String>,
    /// Valid from (Unix millis), open-ended when `None`
    pub valid_from: Option<i64>,
    /// Valid until (Unix millis, exclusive), open-ended when `None`
    pub valid_until: Option<i64>,
    pub created_at: i64,
}

impl Promotion {
    /// Whether the promotion window contains `now` (Unix millis)
    pub fn is_active_at(&self, now: i64) -> bool {
        self.valid_from.is_none_or(|from| from <= now)
            && self.valid_until.is_none_or(|until| now < until)
    }
}

/// Create promotion payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionCreate {
    pub promocode: String,
    pub promo_value: f64,
    pub url: Option<String>,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
    #[serde(default)]
    pub product_ids: Vec<i64>,
}

/// Update promotion payload
///
/// Absent fields keep their value. `clear_url` and `clear_window` reset the
/// URL and both window bounds to `None` before any supplied value applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromotionUpdate {
    pub promocode: Option<String>,
    pub promo_value: Option<f64>,
    pub url: Option<String>,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
    pub product_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub clear_url: bool,
    #[serde(default)]
    pub clear_window: bool,
}

/// Promotion with the ids of the products it covers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionDetail {
    #[serde(flatten)]
    pub promotion: Promotion,
    pub product_ids: Vec<i64>,
    /// Window evaluated at read time
    pub is_active: bool,
}
