//! Outcome of a swap.

use core::fmt;

use serde::Serialize;

use super::{Amount, Asset};
use crate::error::AmmError;

/// The amounts exchanged by one swap.
///
/// # Invariants
///
/// - `amount_in > 0` and `amount_out > 0`.
/// - `fee < amount_in`, so the net input credited to the reserve is positive.
///
/// # Examples
///
/// ```
/// use carbon_amm::domain::{Amount, Asset, SwapReceipt};
///
/// let receipt = SwapReceipt::new(Asset::Base, Amount::new(10_000), Amount::new(30), Amount::new(908))
///     .expect("valid receipt");
/// assert_eq!(receipt.net_input(), Amount::new(9_970));
/// assert_eq!(receipt.asset_out(), Asset::Token);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SwapReceipt {
    asset_in: Asset,
    amount_in: Amount,
    fee: Amount,
    amount_out: Amount,
}

impl SwapReceipt {
    /// Creates a receipt with validated invariants.
    ///
    /// `amount_out` may be zero: a dust swap is priced, not rejected.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidAmount`] if `amount_in` is zero or
    /// `fee >= amount_in`.
    pub fn new(
        asset_in: Asset,
        amount_in: Amount,
        fee: Amount,
        amount_out: Amount,
    ) -> crate::error::Result<Self> {
        if amount_in.is_zero() {
            return Err(AmmError::InvalidAmount("amount_in must be positive"));
        }
        if fee >= amount_in {
            return Err(AmmError::InvalidAmount("fee must be less than amount_in"));
        }
        Ok(Self {
            asset_in,
            amount_in,
            fee,
            amount_out,
        })
    }

    /// Asset paid into the pool.
    #[must_use]
    pub const fn asset_in(&self) -> Asset {
        self.asset_in
    }

    /// Asset paid out of the pool.
    #[must_use]
    pub const fn asset_out(&self) -> Asset {
        self.asset_in.other()
    }

    /// Gross input, fee included.
    pub const fn amount_in(&self) -> &Amount {
        &self.amount_in
    }

    /// Fee withheld into the input asset's fee reserve.
    pub const fn fee(&self) -> &Amount {
        &self.fee
    }

    /// Input credited to the tradable reserve (`amount_in - fee`).
    pub fn net_input(&self) -> Amount {
        self.amount_in
            .checked_sub(&self.fee)
            .unwrap_or_default()
    }

    /// Amount paid out to the caller.
    pub const fn amount_out(&self) -> &Amount {
        &self.amount_out
    }
}

impl fmt::Display for SwapReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Swap({} {} -> {} {}, fee={})",
            self.amount_in,
            self.asset_in,
            self.amount_out,
            self.asset_out(),
            self.fee
        )
    }
}
