//! Ratio helpers for pool arithmetic.
//!
//! Every price-preserving computation in the pool is a scaled ratio
//! `a × b / d`.  [`mul_div`] multiplies first at full precision, then
//! divides once, so no precision is lost to an intermediate truncation.
//!
//! # Convention
//!
//! **Always round against the caller** (pool-favourable).  Every quantity
//! below is floored, so the truncated remainder stays in the pool:
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Swap output | down |
//! | Paired token deposit | down |
//! | Redemption payout | down |
//! | Fee | down |
//!
//! # Examples
//!
//! ```
//! use carbon_amm::domain::Amount;
//! use carbon_amm::math::mul_div;
//!
//! let out = mul_div(&Amount::new(9_970), &Amount::new(1_000), &Amount::new(10_970));
//! assert_eq!(out, Some(Amount::new(908)));
//! assert_eq!(mul_div(&Amount::new(1), &Amount::new(1), &Amount::zero()), None);
//! ```

use crate::domain::Amount;

/// Computes `floor(a × b / denominator)`.
///
/// Returns [`None`] if `denominator` is zero.
#[must_use]
pub fn mul_div(a: &Amount, b: &Amount, denominator: &Amount) -> Option<Amount> {
    (a * b).checked_div(denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportional_redemption() {
        // 250 of 1000 shares against a 2000 token reserve
        let out = mul_div(&Amount::new(250), &Amount::new(2_000), &Amount::new(1_000));
        assert_eq!(out, Some(Amount::new(500)));
    }

    #[test]
    fn truncates_toward_zero() {
        let out = mul_div(&Amount::new(7), &Amount::new(1), &Amount::new(2));
        assert_eq!(out, Some(Amount::new(3)));
        let dust = mul_div(&Amount::new(5), &Amount::new(1_004), &Amount::new(997_003_005));
        assert_eq!(dust, Some(Amount::zero()));
    }

    #[test]
    fn zero_denominator() {
        assert_eq!(
            mul_div(&Amount::new(7), &Amount::new(1), &Amount::zero()),
            None
        );
    }

    #[test]
    fn no_intermediate_overflow() {
        let max = Amount::new(u128::MAX);
        assert_eq!(mul_div(&max, &max, &max), Some(max));
    }
}
