//! Swap fee expressed as an exact fraction.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Amount;
use crate::error::AmmError;

/// Fee rate charged on the input side of every swap, as
/// `numerator / denominator`.
///
/// The denominator is always non-zero and the numerator strictly smaller,
/// so a fee can never consume the whole input.
///
/// # Examples
///
/// ```
/// use carbon_amm::domain::{Amount, SwapFee};
///
/// let fee = SwapFee::DEFAULT;
/// assert_eq!((fee.numerator(), fee.denominator()), (3, 1_000));
/// assert_eq!(fee.apply_to_amount(&Amount::new(10_000)), Amount::new(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSwapFee", into = "RawSwapFee")]
pub struct SwapFee {
    numerator: u64,
    denominator: u64,
}

impl SwapFee {
    /// 0.3%, the rate every new pool starts with.
    pub const DEFAULT: Self = Self {
        numerator: 3,
        denominator: 1_000,
    };

    /// Fee-free swaps.
    pub const ZERO: Self = Self {
        numerator: 0,
        denominator: 1,
    };

    /// Creates a validated fee fraction.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidFee`] if `denominator` is zero.
    /// - [`AmmError::InvalidFee`] if `numerator >= denominator`.
    pub const fn new(numerator: u64, denominator: u64) -> crate::error::Result<Self> {
        if denominator == 0 {
            return Err(AmmError::InvalidFee("denominator must be non-zero"));
        }
        if numerator >= denominator {
            return Err(AmmError::InvalidFee("fee must be below 100%"));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Returns the fee numerator.
    #[must_use]
    pub const fn numerator(&self) -> u64 {
        self.numerator
    }

    /// Returns the fee denominator.
    #[must_use]
    pub const fn denominator(&self) -> u64 {
        self.denominator
    }

    /// Computes `floor(amount × numerator / denominator)`.
    pub fn apply_to_amount(&self, amount: &Amount) -> Amount {
        let scaled = amount * &Amount::from(self.numerator);
        // denominator is non-zero by construction
        scaled
            .checked_div(&Amount::from(self.denominator))
            .unwrap_or_default()
    }
}

impl Default for SwapFee {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for SwapFee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[derive(Serialize, Deserialize)]
struct RawSwapFee {
    numerator: u64,
    denominator: u64,
}

impl TryFrom<RawSwapFee> for SwapFee {
    type Error = AmmError;

    fn try_from(raw: RawSwapFee) -> Result<Self, Self::Error> {
        Self::new(raw.numerator, raw.denominator)
    }
}

impl From<SwapFee> for RawSwapFee {
    fn from(fee: SwapFee) -> Self {
        Self {
            numerator: fee.numerator,
            denominator: fee.denominator,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_denominator() {
        assert!(matches!(SwapFee::new(0, 0), Err(AmmError::InvalidFee(_))));
    }

    #[test]
    fn rejects_full_fee() {
        assert!(SwapFee::new(1_000, 1_000).is_err());
        assert!(SwapFee::new(999, 1_000).is_ok());
    }

    #[test]
    fn default_truncates_small_inputs() {
        // 100 * 3 / 1000 = 0.3 → 0
        assert_eq!(
            SwapFee::DEFAULT.apply_to_amount(&Amount::new(100)),
            Amount::zero()
        );
        assert_eq!(
            SwapFee::DEFAULT.apply_to_amount(&Amount::new(10_000)),
            Amount::new(30)
        );
    }

    #[test]
    fn zero_fee_is_free() {
        assert_eq!(
            SwapFee::ZERO.apply_to_amount(&Amount::new(u128::MAX)),
            Amount::zero()
        );
    }

    #[test]
    fn display() {
        assert_eq!(SwapFee::DEFAULT.to_string(), "3/1000");
    }

    #[test]
    fn deserialize_validates() {
        assert!(serde_json::from_str::<SwapFee>(r#"{"numerator":1,"denominator":0}"#).is_err());
        let Ok(fee) = serde_json::from_str::<SwapFee>(r#"{"numerator":5,"denominator":10000}"#)
        else {
            panic!("valid fee");
        };
        assert_eq!(fee.numerator(), 5);
    }
}
