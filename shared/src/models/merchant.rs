//! Merchant Model

use serde::{Deserialize, Serialize};

/// Merchant entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Merchant {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub company: String,
    pub logo_url: Option<String>,
    /// Mean carbon emission of the merchant's products.
    /// `None` while the merchant has no products.
    pub carbon_rating: Option<f64>,
    pub created_at: i64,
}

/// Create merchant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantCreate {
    pub username: String,
    pub email: String,
    pub company: String,
    pub logo_url: Option<String>,
}
