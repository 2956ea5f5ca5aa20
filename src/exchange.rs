//! The exchange state machine.
//!
//! [`Exchange`] runs every operation as one read-modify-write cycle against
//! a [`TransactionContext`]:
//!
//! 1. read the pool record (an absent record is the genesis pool),
//! 2. validate and compute the transition on a local copy,
//! 3. write the new record back only if every step succeeded.
//!
//! Nothing is cached between invocations; every call re-reads the latest
//! snapshot the store hands it.  Serializability of concurrent calls is the
//! store's responsibility.
//!
//! # Examples
//!
//! ```
//! use carbon_amm::prelude::*;
//!
//! let ledger = MemoryLedger::new();
//! let exchange = Exchange::default();
//! let alice = CallerId::new("alice");
//!
//! let Ok(created) = ledger.execute(alice.clone(), |tx| {
//!     exchange.create_pool(tx, &alice, &Amount::new(1_000))
//! }) else {
//!     panic!("create_pool");
//! };
//! assert_eq!(created.outcome.shares, Amount::new(1_000));
//!
//! let Ok(reserves) = ledger.execute(alice, |tx| exchange.get_reserves(&*tx)) else {
//!     panic!("get_reserves");
//! };
//! assert_eq!(reserves.token, Amount::new(1_000));
//! ```

use serde::Serialize;
use tracing::{debug, debug_span, warn};

use crate::config::ExchangeConfig;
use crate::domain::{
    Amount, Asset, CallerId, LiquidityChange, Reserves, SwapFee, SwapReceipt, TxId,
};
use crate::error::{AmmError, Result};
use crate::pool::{Pool, PoolRecord};
use crate::store::TransactionContext;

/// Result of a committed state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Committed<T> {
    /// Identifier of the transaction that carried the transition.
    pub tx_id: TxId,
    /// What the transition computed.
    pub outcome: T,
}

/// Stateless driver of the singleton pool stored under
/// [`ExchangeConfig::pool_key`].
#[derive(Debug, Clone, Default)]
pub struct Exchange {
    config: ExchangeConfig,
}

impl Exchange {
    /// Creates an exchange bound to `config`.
    #[must_use]
    pub const fn new(config: ExchangeConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    // -- Lifecycle --------------------------------------------------------

    /// Writes an empty pool record carrying the configured swap fee.
    ///
    /// # Errors
    ///
    /// - [`AmmError::AlreadyInitialized`] if a record already exists.
    /// - [`AmmError::Store`] on read/write failure.
    pub fn init<C: TransactionContext>(&self, ctx: &mut C) -> Result<Committed<()>> {
        let tx_id = ctx.transaction_id();
        let span = debug_span!("amm", op = "init", tx = %tx_id);
        let _guard = span.enter();

        match self.write_genesis(ctx) {
            Ok(()) => {
                debug!(fee = %self.config.swap_fee(), "pool record initialized");
                Ok(Committed { tx_id, outcome: () })
            }
            Err(err) => {
                warn!(kind = %err.kind(), %err, "rejected");
                Err(err)
            }
        }
    }

    /// Seeds the token side of an uninitialized pool.
    ///
    /// # Errors
    ///
    /// See [`Pool::create`]; also [`AmmError::Store`].
    pub fn create_pool<C: TransactionContext>(
        &self,
        ctx: &mut C,
        caller: &CallerId,
        token_amount: &Amount,
    ) -> Result<Committed<LiquidityChange>> {
        self.transact("create_pool", ctx, caller, |pool| {
            let change = pool.create(caller, token_amount)?;
            debug!(token = %change.token, shares = %change.shares, "pool created");
            Ok(change)
        })
    }

    // -- Liquidity --------------------------------------------------------

    /// Deposits `base_amount` and the price-preserving token amount.
    ///
    /// # Errors
    ///
    /// See [`Pool::add_liquidity`]; also [`AmmError::Store`].
    pub fn add_liquidity<C: TransactionContext>(
        &self,
        ctx: &mut C,
        caller: &CallerId,
        base_amount: &Amount,
    ) -> Result<Committed<LiquidityChange>> {
        self.transact("add_liquidity", ctx, caller, |pool| {
            let change = pool.add_liquidity(caller, base_amount)?;
            debug!(
                base = %change.base,
                token = %change.token,
                shares = %change.shares,
                "liquidity added"
            );
            Ok(change)
        })
    }

    /// Redeems `share_amount` of the caller's shares.
    ///
    /// # Errors
    ///
    /// See [`Pool::remove_liquidity`]; also [`AmmError::Store`].
    pub fn remove_liquidity<C: TransactionContext>(
        &self,
        ctx: &mut C,
        caller: &CallerId,
        share_amount: &Amount,
    ) -> Result<Committed<LiquidityChange>> {
        self.transact("remove_liquidity", ctx, caller, |pool| {
            let change = pool.remove_liquidity(caller, share_amount)?;
            debug!(
                base = %change.base,
                token = %change.token,
                shares = %change.shares,
                "liquidity removed"
            );
            Ok(change)
        })
    }

    /// Redeems every share the caller holds.
    ///
    /// # Errors
    ///
    /// See [`Pool::remove_all_liquidity`]; also [`AmmError::Store`].
    pub fn remove_all_liquidity<C: TransactionContext>(
        &self,
        ctx: &mut C,
        caller: &CallerId,
    ) -> Result<Committed<LiquidityChange>> {
        self.transact("remove_all_liquidity", ctx, caller, |pool| {
            let change = pool.remove_all_liquidity(caller)?;
            debug!(
                base = %change.base,
                token = %change.token,
                shares = %change.shares,
                "all liquidity removed"
            );
            Ok(change)
        })
    }

    // -- Swaps ------------------------------------------------------------

    /// Sells `token_amount_in` tokens for base.
    ///
    /// # Errors
    ///
    /// See [`Pool::swap`]; also [`AmmError::Store`].
    pub fn swap_tokens_for_base<C: TransactionContext>(
        &self,
        ctx: &mut C,
        caller: &CallerId,
        token_amount_in: &Amount,
    ) -> Result<Committed<SwapReceipt>> {
        self.swap("swap_tokens_for_base", ctx, caller, Asset::Token, token_amount_in)
    }

    /// Sells `base_amount_in` base for tokens.
    ///
    /// # Errors
    ///
    /// See [`Pool::swap`]; also [`AmmError::Store`].
    pub fn swap_base_for_tokens<C: TransactionContext>(
        &self,
        ctx: &mut C,
        caller: &CallerId,
        base_amount_in: &Amount,
    ) -> Result<Committed<SwapReceipt>> {
        self.swap("swap_base_for_tokens", ctx, caller, Asset::Base, base_amount_in)
    }

    fn swap<C: TransactionContext>(
        &self,
        op: &'static str,
        ctx: &mut C,
        caller: &CallerId,
        asset_in: Asset,
        amount_in: &Amount,
    ) -> Result<Committed<SwapReceipt>> {
        self.transact(op, ctx, caller, |pool| {
            let receipt = pool.swap(asset_in, amount_in)?;
            debug!(
                amount_in = %receipt.amount_in(),
                fee = %receipt.fee(),
                amount_out = %receipt.amount_out(),
                "swap executed"
            );
            Ok(receipt)
        })
    }

    // -- Administration ---------------------------------------------------

    /// Evicts the provider at ordinal `index`, forfeiting their shares.
    ///
    /// Returns the evicted identity and the number of shares burned.
    ///
    /// # Errors
    ///
    /// See [`Pool::remove_provider`]; also [`AmmError::Store`].
    pub fn remove_provider<C: TransactionContext>(
        &self,
        ctx: &mut C,
        caller: &CallerId,
        index: u64,
    ) -> Result<Committed<(CallerId, Amount)>> {
        self.transact("remove_provider", ctx, caller, |pool| {
            let (provider, forfeited) = pool.remove_provider(index)?;
            warn!(%provider, %forfeited, "provider evicted, shares forfeited");
            Ok((provider, forfeited))
        })
    }

    // -- Queries ----------------------------------------------------------

    /// Current tradable reserves.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Store`] if the record cannot be read.
    pub fn get_reserves<C: TransactionContext>(&self, ctx: &C) -> Result<Reserves> {
        Ok(self.load(ctx)?.reserves())
    }

    /// Current swap fee.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Store`] if the record cannot be read.
    pub fn get_swap_fee<C: TransactionContext>(&self, ctx: &C) -> Result<SwapFee> {
        Ok(self.load(ctx)?.swap_fee())
    }

    /// Fees accrued per asset.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Store`] if the record cannot be read.
    pub fn get_fee_reserves<C: TransactionContext>(&self, ctx: &C) -> Result<Reserves> {
        Ok(self.load(ctx)?.fee_reserves())
    }

    /// Share balance of `provider`; zero if unknown.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Store`] if the record cannot be read.
    pub fn get_shares<C: TransactionContext>(
        &self,
        ctx: &C,
        provider: &CallerId,
    ) -> Result<Amount> {
        Ok(self.load(ctx)?.shares_of(provider))
    }

    /// Outstanding share supply.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Store`] if the record cannot be read.
    pub fn get_total_shares<C: TransactionContext>(&self, ctx: &C) -> Result<Amount> {
        Ok(self.load(ctx)?.total_shares().clone())
    }

    /// Providers in order of first deposit.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Store`] if the record cannot be read.
    pub fn get_providers<C: TransactionContext>(&self, ctx: &C) -> Result<Vec<CallerId>> {
        Ok(self.load(ctx)?.liquidity_providers().to_vec())
    }

    /// Loads the pool snapshot visible to `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Store`] if the read fails or the record is
    /// corrupt.
    pub fn load<C: TransactionContext>(&self, ctx: &C) -> Result<Pool> {
        match ctx.read(self.config.pool_key())? {
            Some(bytes) => Ok(PoolRecord::decode(&bytes)?),
            None => Ok(Pool::genesis(self.config.swap_fee())),
        }
    }

    // -- Internals --------------------------------------------------------

    fn write_genesis<C: TransactionContext>(&self, ctx: &mut C) -> Result<()> {
        if ctx.read(self.config.pool_key())?.is_some() {
            return Err(AmmError::AlreadyInitialized);
        }
        self.save(ctx, &Pool::genesis(self.config.swap_fee()))
    }

    fn save<C: TransactionContext>(&self, ctx: &mut C, pool: &Pool) -> Result<()> {
        let bytes = PoolRecord::encode(pool)?;
        ctx.write(self.config.pool_key(), bytes)?;
        Ok(())
    }

    fn transact<C, T, F>(
        &self,
        op: &'static str,
        ctx: &mut C,
        caller: &CallerId,
        f: F,
    ) -> Result<Committed<T>>
    where
        C: TransactionContext,
        F: FnOnce(&mut Pool) -> Result<T>,
    {
        let tx_id = ctx.transaction_id();
        let span = debug_span!("amm", op, caller = %caller, tx = %tx_id);
        let _guard = span.enter();

        let result = self.load(ctx).and_then(|mut pool| {
            let outcome = f(&mut pool)?;
            self.save(ctx, &pool)?;
            Ok(outcome)
        });
        match result {
            Ok(outcome) => Ok(Committed { tx_id, outcome }),
            Err(err) => {
                warn!(kind = %err.kind(), %err, "rejected");
                Err(err)
            }
        }
    }
}
