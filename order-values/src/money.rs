//! Money helpers
//!
//! All calculations stay in `Decimal`; rounding happens only at the
//! reporting boundary, never between intermediate additions.

use rust_decimal::prelude::*;

/// Rounding for reported monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Round a decimal for display (2 decimal places, midpoint away from zero)
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a decimal to f64 at the reporting boundary, rounded to 2 places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_accumulation() {
        // Sum 0.01 one thousand times — drift-free in Decimal
        let mut total = Decimal::ZERO;
        for _ in 0..1000 {
            total += Decimal::new(1, 2);
        }
        assert_eq!(to_f64(total), 10.0);
    }

    #[test]
    fn test_rounding_half_up() {
        // 0.005 rounds up to 0.01
        assert_eq!(round_money(Decimal::new(5, 3)), Decimal::new(1, 2));
        // 0.004 rounds down to 0.00
        assert_eq!(round_money(Decimal::new(4, 3)), Decimal::ZERO);
    }

    #[test]
    fn test_to_f64_boundary() {
        let value = Decimal::from_str_exact("59.6700").unwrap();
        assert_eq!(to_f64(value), 59.67);
    }
}
