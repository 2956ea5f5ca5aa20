//! Effect of a deposit or withdrawal on the pool.

use core::fmt;

use serde::Serialize;

use super::Amount;

/// Direction of a liquidity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Reserves and shares grew.
    Add,
    /// Reserves and shares shrank.
    Remove,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "Add"),
            Self::Remove => write!(f, "Remove"),
        }
    }
}

/// Amounts moved by one liquidity operation.
///
/// For [`ChangeType::Add`] the amounts were deposited and `shares` minted;
/// for [`ChangeType::Remove`] the amounts were paid out and `shares` burned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LiquidityChange {
    /// Direction of the change.
    pub change_type: ChangeType,
    /// Base-asset amount moved.
    pub base: Amount,
    /// Token amount moved.
    pub token: Amount,
    /// Shares minted or burned.
    pub shares: Amount,
}

impl LiquidityChange {
    /// A deposit of `base` and `token` minting `shares`.
    pub fn add(base: Amount, token: Amount, shares: Amount) -> Self {
        Self {
            change_type: ChangeType::Add,
            base,
            token,
            shares,
        }
    }

    /// A redemption of `shares` paying out `base` and `token`.
    pub fn remove(base: Amount, token: Amount, shares: Amount) -> Self {
        Self {
            change_type: ChangeType::Remove,
            base,
            token,
            shares,
        }
    }

    /// Returns `true` for deposits.
    #[must_use]
    pub const fn is_add(&self) -> bool {
        matches!(self.change_type, ChangeType::Add)
    }
}

impl fmt::Display for LiquidityChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}(base={}, token={}, shares={})",
            self.change_type, self.base, self.token, self.shares
        )
    }
}
