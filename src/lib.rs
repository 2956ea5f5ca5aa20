//! # Carbon AMM
//!
//! State machine of a two-asset constant-product automated market maker.
//!
//! A single pool holds a *base* asset and a *token*.  Participants deposit
//! paired liquidity in exchange for proportional shares, redeem shares for
//! their cut of both reserves, and swap one asset for the other at the price
//! set by `base × token = k`.  A fee is withheld from every swap input and
//! accrued in a fee reserve kept apart from the tradable reserves.
//!
//! All amounts are arbitrary-precision non-negative integers transported as
//! base-10 strings; every division truncates in favour of the pool.
//!
//! # Quick Start
//!
//! ```rust
//! use carbon_amm::prelude::*;
//!
//! let ledger = MemoryLedger::new();
//! let exchange = Exchange::default();
//! let alice = CallerId::new("alice");
//!
//! // Seed both sides of the pool at 1:1.
//! let seeded = ledger.execute(alice.clone(), |tx| {
//!     exchange.create_pool(tx, &alice, &Amount::new(1_000))?;
//!     exchange.add_liquidity(tx, &alice, &Amount::new(1_000))
//! });
//! assert!(seeded.is_ok());
//!
//! // Sell 100 base for tokens.
//! let Ok(swap) = ledger.execute(alice.clone(), |tx| {
//!     exchange.swap_base_for_tokens(tx, &alice, &Amount::new(100))
//! }) else {
//!     panic!("swap");
//! };
//! assert_eq!(swap.outcome.amount_out(), &Amount::new(181));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   dispatch    │  operation name + string args → Response
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐
//! │   exchange    │  one atomic read-modify-write per operation
//! └──────┬───────┘
//!        │ TransactionContext (read / write / caller / tx id)
//!        ▼
//! ┌──────────────┐      ┌──────────────┐
//! │     pool      │ ───▶ │    store      │  PoolRecord (versioned JSON)
//! └──────┬───────┘      └──────────────┘
//!        ▼
//! ┌──────────────┐
//! │ domain / math │  Amount, SwapFee, Reserves, mul_div, …
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Amount`](domain::Amount), [`SwapFee`](domain::SwapFee), [`CallerId`](domain::CallerId), etc. |
//! | [`math`] | [`mul_div`](math::mul_div), floor division at full precision |
//! | [`pool`] | The [`Pool`](pool::Pool) aggregate and its persisted [`PoolRecord`](pool::PoolRecord) |
//! | [`store`] | [`TransactionContext`](store::TransactionContext) contract and [`MemoryLedger`](store::MemoryLedger) |
//! | [`config`] | [`ExchangeConfig`](config::ExchangeConfig) |
//! | [`exchange`] | [`Exchange`](exchange::Exchange), the transactional state machine |
//! | [`dispatch`] | Name-addressed surface returning [`Response`](dispatch::Response) |
//! | [`error`] | [`AmmError`](error::AmmError) and [`ErrorKind`](error::ErrorKind) |
//! | [`prelude`] | Convenience re-exports |
//!
//! # Logging
//!
//! Operations emit [`tracing`] spans and events (`debug` on success, `warn`
//! on rejection).  The crate never installs a subscriber.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod math;
pub mod pool;
pub mod prelude;
pub mod store;
