//! Value types shared by the pool, the store codec and the dispatcher.
//!
//! Amounts are arbitrary-precision and travel as decimal strings; identities
//! are opaque strings handed over by the execution environment.

mod amount;
mod asset;
mod caller_id;
mod liquidity_change;
mod reserves;
mod swap_fee;
mod swap_receipt;

pub use amount::Amount;
pub use asset::Asset;
pub use caller_id::{CallerId, TxId};
pub use liquidity_change::{ChangeType, LiquidityChange};
pub use reserves::Reserves;
pub use swap_fee::SwapFee;
pub use swap_receipt::SwapReceipt;
