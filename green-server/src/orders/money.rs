//! Order money calculation
//!
//! Totals are summed in `Decimal` from the line unit prices and rounded to
//! cents once.

use rust_decimal::Decimal;
use shared::models::OrderItem;

use crate::utils::decimal::to_decimal;
use crate::utils::{AppError, AppResult};

/// Maximum quantity of one product on one order line
pub const MAX_QUANTITY: i32 = 9999;

/// quantity × unit price
#[inline]
pub fn line_total(unit_price: f64, quantity: i32) -> Decimal {
    to_decimal(unit_price) * Decimal::from(quantity)
}

/// Σ quantity × unit price over all lines
pub fn compute_order_total(items: &[OrderItem]) -> Decimal {
    items
        .iter()
        .map(|item| line_total(item.unit_price, item.quantity))
        .sum()
}

/// Quantities must be in `1..=MAX_QUANTITY`
pub fn validate_quantity(quantity: i32) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::validation(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::decimal::money_to_f64;

    fn item(product_id: i64, unit_price: f64, quantity: i32) -> OrderItem {
        OrderItem {
            id: product_id,
            order_id: 1,
            product_id: Some(product_id),
            product_name: format!("p{product_id}"),
            unit_price,
            quantity,
        }
    }

    #[test]
    fn test_empty_order_is_zero() {
        assert_eq!(compute_order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_total_sums_lines() {
        let items = [item(1, 3.5, 2), item(2, 1.25, 4)];
        assert_eq!(money_to_f64(compute_order_total(&items)), 12.0);
    }

    #[test]
    fn test_total_has_no_float_drift() {
        // 0.1 × 3 + 0.2 accumulates error in f64
        let items = [item(1, 0.1, 3), item(2, 0.2, 1)];
        assert_eq!(money_to_f64(compute_order_total(&items)), 0.5);
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(MAX_QUANTITY + 1).is_err());
    }
}
