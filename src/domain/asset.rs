//! The two sides of the pool.

use core::fmt;

use serde::{Deserialize, Serialize};

/// One of the two assets held by the pool.
///
/// Shares are denominated in [`Asset::Base`] units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    /// The base asset (the native coin of the ledger).
    Base,
    /// The pool's fungible token.
    Token,
}

impl Asset {
    /// Returns the opposite side of the pool.
    #[must_use]
    pub const fn other(&self) -> Self {
        match self {
            Self::Base => Self::Token,
            Self::Token => Self::Base,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str("base"),
            Self::Token => f.write_str("token"),
        }
    }
}
