//! Emission aggregation
//!
//! Pure functions over in-memory slices. Inputs are never mutated; results
//! are exact `Decimal` values, rounded only when stored.

use rust_decimal::Decimal;
use shared::models::{Product, ProductIngredient};

use crate::utils::decimal::to_decimal;
use crate::utils::{AppError, AppResult};

/// Total emission of one product: Σ serving_qty × emission_per_gram
///
/// An empty composition yields zero.
pub fn compute_product_emission(associations: &[ProductIngredient]) -> Decimal {
    associations
        .iter()
        .map(|a| to_decimal(a.serving_qty) * to_decimal(a.emission_per_gram))
        .sum()
}

/// Merchant carbon rating: arithmetic mean of product emissions
///
/// Fails with `InvalidState` for an empty product list.
pub fn compute_merchant_rating(products: &[Product]) -> AppResult<Decimal> {
    if products.is_empty() {
        return Err(AppError::invalid_state(
            "cannot compute carbon rating of a merchant without products",
        ));
    }
    let total: Decimal = products
        .iter()
        .map(|p| to_decimal(p.carbon_emission))
        .sum();
    Ok(total / Decimal::from(products.len()))
}
