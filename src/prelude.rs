//! Convenience re-exports for common types.
//!
//! ```rust
//! use carbon_amm::prelude::*;
//! ```

pub use crate::config::ExchangeConfig;
pub use crate::dispatch::{handle, Operation, Response};
pub use crate::domain::{
    Amount, Asset, CallerId, LiquidityChange, Reserves, SwapFee, SwapReceipt, TxId,
};
pub use crate::error::{AmmError, ErrorKind, Result, StoreError};
pub use crate::exchange::{Committed, Exchange};
pub use crate::pool::Pool;
pub use crate::store::{MemoryLedger, TransactionContext};
