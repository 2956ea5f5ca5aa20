//! The pool aggregate and its constant-product transitions.
//!
//! # Swap Algorithm (asset X → asset Y)
//!
//! 1. `fee = floor(amount_in × fee_num / fee_den)`
//! 2. `net_input = amount_in − fee`
//! 3. `amount_out = floor(net_input × reserve_y / (reserve_x + net_input))`
//! 4. `reserve_x += net_input`, `fee_reserve_x += fee`
//! 5. `reserve_y −= amount_out`
//!
//! The fee is set aside in a separate fee reserve and never re-enters the
//! pricing curve.  Because the output is floored,
//! `(reserve_x + net_input) × (reserve_y − amount_out) ≥ reserve_x × reserve_y`.
//!
//! # Share Accounting
//!
//! Shares are denominated in base-asset units.  `total_shares` always equals
//! the sum of every provider's balance, and the provider index lists exactly
//! the identities holding a positive balance, in order of first deposit.
//!
//! Every transition validates and computes its full result before touching
//! `self`, so a failed call leaves the pool unchanged.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Amount, Asset, CallerId, LiquidityChange, Reserves, SwapFee, SwapReceipt};
use crate::error::AmmError;
use crate::math::mul_div;

/// The singleton liquidity pool.
///
/// # State
///
/// - `base_reserve` / `token_reserve`: tradable balances used for pricing
/// - `base_fee_reserve` / `token_fee_reserve`: fees withheld per input asset
/// - `swap_fee`: fee fraction applied to swap inputs
/// - `liquidity_providers`: holders in order of first deposit
/// - `total_shares` / `lp_shares`: outstanding claims on the reserves
///
/// # Example
///
/// ```rust
/// use carbon_amm::domain::{Amount, Asset, CallerId, SwapFee};
/// use carbon_amm::pool::Pool;
///
/// let mut pool = Pool::genesis(SwapFee::DEFAULT);
/// let alice = CallerId::new("alice");
/// pool.create(&alice, &Amount::new(1_000)).expect("created");
/// pool.add_liquidity(&alice, &Amount::new(1_000)).expect("seeded");
///
/// let receipt = pool.swap(Asset::Base, &Amount::new(100)).expect("swap ok");
/// assert!(!receipt.amount_out().is_zero());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    pub(super) base_reserve: Amount,
    pub(super) token_reserve: Amount,
    pub(super) base_fee_reserve: Amount,
    pub(super) token_fee_reserve: Amount,
    pub(super) swap_fee: SwapFee,
    pub(super) liquidity_providers: Vec<CallerId>,
    pub(super) total_shares: Amount,
    pub(super) lp_shares: BTreeMap<CallerId, Amount>,
}

impl Pool {
    /// The zero-valued pool that exists before any operation.
    pub fn genesis(swap_fee: SwapFee) -> Self {
        Self {
            base_reserve: Amount::zero(),
            token_reserve: Amount::zero(),
            base_fee_reserve: Amount::zero(),
            token_fee_reserve: Amount::zero(),
            swap_fee,
            liquidity_providers: Vec::new(),
            total_shares: Amount::zero(),
            lp_shares: BTreeMap::new(),
        }
    }

    // -- Queries ----------------------------------------------------------

    /// Returns the tradable base-asset reserve.
    pub const fn base_reserve(&self) -> &Amount {
        &self.base_reserve
    }

    /// Returns the tradable token reserve.
    pub const fn token_reserve(&self) -> &Amount {
        &self.token_reserve
    }

    /// Returns both tradable reserves.
    pub fn reserves(&self) -> Reserves {
        Reserves::new(self.base_reserve.clone(), self.token_reserve.clone())
    }

    /// Returns the accrued fee reserves.
    pub fn fee_reserves(&self) -> Reserves {
        Reserves::new(
            self.base_fee_reserve.clone(),
            self.token_fee_reserve.clone(),
        )
    }

    /// Returns the swap fee fraction.
    #[must_use]
    pub const fn swap_fee(&self) -> SwapFee {
        self.swap_fee
    }

    /// Returns the providers with a positive balance, in order of first deposit.
    #[must_use]
    pub fn liquidity_providers(&self) -> &[CallerId] {
        &self.liquidity_providers
    }

    /// Returns the outstanding share supply.
    pub const fn total_shares(&self) -> &Amount {
        &self.total_shares
    }

    /// Returns `provider`'s share balance (zero when unknown).
    pub fn shares_of(&self, provider: &CallerId) -> Amount {
        self.lp_shares.get(provider).cloned().unwrap_or_default()
    }

    /// Returns every provider balance keyed by identity.
    #[must_use]
    pub const fn lp_shares(&self) -> &BTreeMap<CallerId, Amount> {
        &self.lp_shares
    }

    /// Returns `true` while both tradable reserves are empty.
    #[must_use]
    pub fn is_uninitialized(&self) -> bool {
        self.base_reserve.is_zero() && self.token_reserve.is_zero()
    }

    /// Verifies the share-accounting invariants.
    ///
    /// # Errors
    ///
    /// Returns a static description of the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), &'static str> {
        let mut sum = Amount::zero();
        for balance in self.lp_shares.values() {
            if balance.is_zero() {
                return Err("zero share balance retained");
            }
            sum += balance;
        }
        if sum != self.total_shares {
            return Err("share balances do not sum to total shares");
        }
        if self.liquidity_providers.len() != self.lp_shares.len()
            || !self
                .liquidity_providers
                .iter()
                .all(|p| self.lp_shares.contains_key(p))
        {
            return Err("provider index does not match share holders");
        }
        let distinct: BTreeSet<&CallerId> = self.liquidity_providers.iter().collect();
        if distinct.len() != self.liquidity_providers.len() {
            return Err("provider index contains duplicates");
        }
        if self.total_shares.is_zero() != self.lp_shares.is_empty() {
            return Err("total shares inconsistent with holders");
        }
        Ok(())
    }

    // -- Liquidity --------------------------------------------------------

    /// Seeds an empty pool with token-side liquidity only.
    ///
    /// The caller receives `token_amount` shares.  Base-side liquidity arrives
    /// with the first [`Pool::add_liquidity`].
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidAmount`] if `token_amount` is zero.
    /// - [`AmmError::AlreadyInitialized`] if either reserve or the share
    ///   supply is non-zero.
    pub fn create(
        &mut self,
        caller: &CallerId,
        token_amount: &Amount,
    ) -> Result<LiquidityChange, AmmError> {
        token_amount.ensure_positive()?;
        if !self.is_uninitialized() || !self.total_shares.is_zero() {
            return Err(AmmError::AlreadyInitialized);
        }

        self.token_reserve = token_amount.clone();
        self.total_shares = token_amount.clone();
        self.credit(caller, token_amount);

        Ok(LiquidityChange::add(
            Amount::zero(),
            token_amount.clone(),
            token_amount.clone(),
        ))
    }

    /// Deposits `base_amount` plus the token amount that preserves the
    /// current price.
    ///
    /// - While there is no base-side liquidity (empty pool, or right after
    ///   [`Pool::create`]) the paired token amount equals `base_amount`.
    /// - Otherwise `token = floor(base_amount × token_reserve / base_reserve)`.
    ///
    /// The caller is credited `base_amount` shares.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidAmount`] if `base_amount` is zero.
    /// - [`AmmError::Uninitialized`] if reserves remain with no shares
    ///   outstanding (the last holder was evicted), or if shares are
    ///   outstanding while both reserves are empty.
    pub fn add_liquidity(
        &mut self,
        caller: &CallerId,
        base_amount: &Amount,
    ) -> Result<LiquidityChange, AmmError> {
        base_amount.ensure_positive()?;
        if self.total_shares.is_zero() != self.is_uninitialized() {
            return Err(AmmError::Uninitialized);
        }

        let token_amount = if self.base_reserve.is_zero() {
            base_amount.clone()
        } else {
            mul_div(base_amount, &self.token_reserve, &self.base_reserve)
                .ok_or(AmmError::Uninitialized)?
        };

        self.base_reserve += base_amount;
        self.token_reserve += &token_amount;
        self.total_shares += base_amount;
        self.credit(caller, base_amount);

        Ok(LiquidityChange::add(
            base_amount.clone(),
            token_amount,
            base_amount.clone(),
        ))
    }

    /// Redeems `share_amount` of the caller's shares for a proportional cut
    /// of both reserves.
    ///
    /// `out_x = floor(share_amount × reserve_x / total_shares)`; the
    /// truncated remainder stays in the pool.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidAmount`] if `share_amount` is zero.
    /// - [`AmmError::NoLiquidity`] if the pool has no outstanding shares.
    /// - [`AmmError::InsufficientShares`] if the caller holds fewer than
    ///   `share_amount` shares.
    pub fn remove_liquidity(
        &mut self,
        caller: &CallerId,
        share_amount: &Amount,
    ) -> Result<LiquidityChange, AmmError> {
        share_amount.ensure_positive()?;
        if self.total_shares.is_zero() {
            return Err(AmmError::NoLiquidity);
        }

        let held = self.shares_of(caller);
        let remaining = held
            .checked_sub(share_amount)
            .ok_or(AmmError::InsufficientShares)?;

        let base_out = mul_div(share_amount, &self.base_reserve, &self.total_shares)
            .ok_or(AmmError::NoLiquidity)?;
        let token_out = mul_div(share_amount, &self.token_reserve, &self.total_shares)
            .ok_or(AmmError::NoLiquidity)?;

        let base_reserve = self
            .base_reserve
            .checked_sub(&base_out)
            .ok_or(AmmError::InsufficientShares)?;
        let token_reserve = self
            .token_reserve
            .checked_sub(&token_out)
            .ok_or(AmmError::InsufficientShares)?;
        let total_shares = self
            .total_shares
            .checked_sub(share_amount)
            .ok_or(AmmError::InsufficientShares)?;

        self.base_reserve = base_reserve;
        self.token_reserve = token_reserve;
        self.total_shares = total_shares;
        self.set_balance(caller, remaining);

        Ok(LiquidityChange::remove(
            base_out,
            token_out,
            share_amount.clone(),
        ))
    }

    /// Redeems every share the caller holds.
    ///
    /// # Errors
    ///
    /// - [`AmmError::NoLiquidity`] if the caller holds no shares.
    /// - Anything [`Pool::remove_liquidity`] returns.
    pub fn remove_all_liquidity(
        &mut self,
        caller: &CallerId,
    ) -> Result<LiquidityChange, AmmError> {
        let held = self.shares_of(caller);
        if held.is_zero() {
            return Err(AmmError::NoLiquidity);
        }
        self.remove_liquidity(caller, &held)
    }

    /// Evicts the provider at ordinal `index`, forfeiting their shares.
    ///
    /// The provider's balance is burned from `total_shares`; the reserves
    /// they had a claim on stay in the pool and accrue to the remaining
    /// holders.  Evicting the last holder leaves those reserves locked:
    /// deposits and swaps fail with [`AmmError::Uninitialized`] from then on.
    /// Returns the evicted identity and the forfeited balance.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidIndex`] if `index` is out of range.
    pub fn remove_provider(&mut self, index: u64) -> Result<(CallerId, Amount), AmmError> {
        let len = self.liquidity_providers.len();
        let position = usize::try_from(index)
            .ok()
            .filter(|i| *i < len)
            .ok_or(AmmError::InvalidIndex { index, len })?;

        let provider = self.liquidity_providers[position].clone();
        let forfeited = self.shares_of(&provider);
        let total_shares = self
            .total_shares
            .checked_sub(&forfeited)
            .ok_or(AmmError::Uninitialized)?;

        self.liquidity_providers.remove(position);
        self.lp_shares.remove(&provider);
        self.total_shares = total_shares;

        Ok((provider, forfeited))
    }

    // -- Swaps ------------------------------------------------------------

    /// Prices a swap of `amount_in` of `asset_in` without mutating the pool.
    ///
    /// An output that floors to zero is a valid quote; slippage limits
    /// belong to the caller.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InvalidAmount`] if `amount_in` is zero.
    /// - [`AmmError::Uninitialized`] if the pool has no outstanding shares.
    /// - [`AmmError::EmptyPool`] if either reserve is empty.  With an empty
    ///   input reserve one unit would buy the whole output reserve, and with
    ///   an empty output reserve every swap pays nothing.
    pub fn quote(&self, asset_in: Asset, amount_in: &Amount) -> Result<SwapReceipt, AmmError> {
        amount_in.ensure_positive()?;
        if self.total_shares.is_zero() {
            return Err(AmmError::Uninitialized);
        }

        let (reserve_in, reserve_out) = self.oriented(asset_in);
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(AmmError::EmptyPool);
        }

        let fee = self.swap_fee.apply_to_amount(amount_in);
        let net_input = amount_in
            .checked_sub(&fee)
            .ok_or(AmmError::InvalidAmount("fee exceeds input"))?;

        let denominator = reserve_in + &net_input;
        let amount_out = mul_div(&net_input, reserve_out, &denominator)
            .ok_or(AmmError::EmptyPool)?;

        SwapReceipt::new(asset_in, amount_in.clone(), fee, amount_out)
    }

    /// Executes a swap of `amount_in` of `asset_in` for the other asset.
    ///
    /// # Errors
    ///
    /// Same as [`Pool::quote`].
    pub fn swap(&mut self, asset_in: Asset, amount_in: &Amount) -> Result<SwapReceipt, AmmError> {
        let receipt = self.quote(asset_in, amount_in)?;
        let net_input = receipt.net_input();

        let (reserve_in, reserve_out) = self.oriented(asset_in);
        let new_reserve_in = reserve_in + &net_input;
        let new_reserve_out = reserve_out
            .checked_sub(receipt.amount_out())
            .ok_or(AmmError::EmptyPool)?;

        match asset_in {
            Asset::Base => {
                self.base_reserve = new_reserve_in;
                self.token_reserve = new_reserve_out;
                self.base_fee_reserve += receipt.fee();
            }
            Asset::Token => {
                self.token_reserve = new_reserve_in;
                self.base_reserve = new_reserve_out;
                self.token_fee_reserve += receipt.fee();
            }
        }

        Ok(receipt)
    }

    // -- Internals --------------------------------------------------------

    const fn oriented(&self, asset_in: Asset) -> (&Amount, &Amount) {
        match asset_in {
            Asset::Base => (&self.base_reserve, &self.token_reserve),
            Asset::Token => (&self.token_reserve, &self.base_reserve),
        }
    }

    fn credit(&mut self, provider: &CallerId, shares: &Amount) {
        let held = self.shares_of(provider);
        self.set_balance(provider, &held + shares);
    }

    fn set_balance(&mut self, provider: &CallerId, balance: Amount) {
        if balance.is_zero() {
            self.lp_shares.remove(provider);
            self.liquidity_providers.retain(|p| p != provider);
        } else if self.lp_shares.insert(provider.clone(), balance).is_none() {
            self.liquidity_providers.push(provider.clone());
        }
    }
}
