//! Versioned on-ledger schema for the pool aggregate.
//!
//! The pool is stored as JSON under a single key.  Every record carries an
//! explicit `version` tag so the layout can evolve without breaking records
//! written by earlier releases:
//!
//! ```json
//! {
//!   "version": "1",
//!   "baseReserve": "500", "tokenReserve": "1500",
//!   "baseFeeReserve": "0", "tokenFeeReserve": "0",
//!   "swapFeeNum": 3, "swapFeeDenom": 1000,
//!   "liquidityProviders": ["alice", "bob"],
//!   "totalShares": "1500",
//!   "lpShares": { "alice": "1000", "bob": "500" }
//! }
//! ```
//!
//! Big integers are always decimal strings.  Decoding re-validates the fee
//! fraction and the share-accounting invariants, so a corrupted record is
//! reported as a store failure rather than silently loaded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Pool;
use crate::domain::{Amount, CallerId, SwapFee};
use crate::error::StoreError;

/// Tagged union of every schema version understood by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "version")]
pub enum PoolRecord {
    /// Initial schema.
    #[serde(rename = "1")]
    V1(PoolRecordV1),
}

/// Version 1 of the pool schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRecordV1 {
    /// Tradable base reserve.
    pub base_reserve: Amount,
    /// Tradable token reserve.
    pub token_reserve: Amount,
    /// Accrued base-asset fees.
    pub base_fee_reserve: Amount,
    /// Accrued token fees.
    pub token_fee_reserve: Amount,
    /// Fee numerator.
    pub swap_fee_num: u64,
    /// Fee denominator.
    pub swap_fee_denom: u64,
    /// Providers in order of first deposit.
    pub liquidity_providers: Vec<CallerId>,
    /// Outstanding share supply.
    pub total_shares: Amount,
    /// Share balance per provider.
    pub lp_shares: BTreeMap<CallerId, Amount>,
}

impl PoolRecord {
    /// Encodes `pool` with the current schema version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialize`] if JSON encoding fails.
    pub fn encode(pool: &Pool) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(&Self::from(pool)).map_err(|e| StoreError::Serialize(e.to_string()))
    }

    /// Decodes and validates a stored pool.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Deserialize`] if the bytes are not a known
    /// schema version, the fee is malformed, or the share ledger is
    /// inconsistent.
    pub fn decode(bytes: &[u8]) -> Result<Pool, StoreError> {
        let record: Self =
            serde_json::from_slice(bytes).map_err(|e| StoreError::Deserialize(e.to_string()))?;
        Pool::try_from(record)
    }
}

impl From<&Pool> for PoolRecord {
    fn from(pool: &Pool) -> Self {
        Self::V1(PoolRecordV1 {
            base_reserve: pool.base_reserve.clone(),
            token_reserve: pool.token_reserve.clone(),
            base_fee_reserve: pool.base_fee_reserve.clone(),
            token_fee_reserve: pool.token_fee_reserve.clone(),
            swap_fee_num: pool.swap_fee.numerator(),
            swap_fee_denom: pool.swap_fee.denominator(),
            liquidity_providers: pool.liquidity_providers.clone(),
            total_shares: pool.total_shares.clone(),
            lp_shares: pool.lp_shares.clone(),
        })
    }
}

impl TryFrom<PoolRecord> for Pool {
    type Error = StoreError;

    fn try_from(record: PoolRecord) -> Result<Self, Self::Error> {
        let PoolRecord::V1(v1) = record;
        let swap_fee = SwapFee::new(v1.swap_fee_num, v1.swap_fee_denom)
            .map_err(|e| StoreError::Deserialize(e.to_string()))?;
        let pool = Self {
            base_reserve: v1.base_reserve,
            token_reserve: v1.token_reserve,
            base_fee_reserve: v1.base_fee_reserve,
            token_fee_reserve: v1.token_fee_reserve,
            swap_fee,
            liquidity_providers: v1.liquidity_providers,
            total_shares: v1.total_shares,
            lp_shares: v1.lp_shares,
        };
        pool.check_invariants()
            .map_err(|reason| StoreError::Deserialize(reason.to_string()))?;
        Ok(pool)
    }
}
