//! Decimal helpers
//!
//! Quantities are stored as `f64`; every sum, product and mean is computed in
//! `Decimal`. Money is rounded to cents on the way back to `f64`; carbon
//! values keep the exact sum.

use rust_decimal::prelude::*;

/// Decimal places kept for monetary values
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal; non-finite input becomes zero
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in decimal calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Round to `places` (half away from zero) and convert back to f64
#[inline]
pub fn to_f64_rounded(value: Decimal, places: u32) -> f64 {
    value
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Emission/rating value for storage, unrounded
///
/// Per-gram factors are small (0.00046 kg CO2e/g), so any fixed rounding
/// would break `emission == Σ serving_qty × emission_per_gram`.
#[inline]
pub fn emission_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Monetary value for storage (2 dp)
#[inline]
pub fn money_to_f64(value: Decimal) -> f64 {
    to_f64_rounded(value, MONEY_DECIMAL_PLACES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        // 0.1 + 0.2 != 0.3 in f64
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);

        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(money_to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_non_finite_becomes_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(money_to_f64(Decimal::new(12345, 3)), 12.35);
    }

    #[test]
    fn test_emission_is_not_rounded() {
        assert_eq!(emission_to_f64(Decimal::new(123455, 5)), 1.23455);
        assert_eq!(emission_to_f64(to_decimal(0.00046) * to_decimal(0.1)), 0.000046);
    }
}
