//! Snapshot of a pair of per-asset balances.

use core::fmt;

use serde::Serialize;

use super::{Amount, Asset};

/// A `(base, token)` pair of balances.
///
/// Returned by the reserve and fee-reserve queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Reserves {
    /// Base-asset side.
    pub base: Amount,
    /// Token side.
    pub token: Amount,
}

impl Reserves {
    /// Creates a new pair.
    pub fn new(base: Amount, token: Amount) -> Self {
        Self { base, token }
    }

    /// Returns the balance of `asset`.
    #[must_use]
    pub const fn of(&self, asset: Asset) -> &Amount {
        match asset {
            Asset::Base => &self.base,
            Asset::Token => &self.token,
        }
    }

    /// Returns the constant product `base × token`.
    pub fn product(&self) -> Amount {
        &self.base * &self.token
    }
}

impl fmt::Display for Reserves {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reserves(base={}, token={})", self.base, self.token)
    }
}
