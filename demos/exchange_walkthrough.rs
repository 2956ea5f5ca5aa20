//! Exchange walkthrough.
//!
//! Drives one pool through its whole lifecycle on an in-memory ledger:
//! seeding, deposits, swaps in both directions, fee accrual, redemption and
//! the name-addressed dispatch surface.
//!
//! # Run
//!
//! ```bash
//! RUST_LOG=carbon_amm=debug cargo run --example exchange_walkthrough
//! ```

use carbon_amm::config::ExchangeConfig;
use carbon_amm::dispatch::handle;
use carbon_amm::domain::{Amount, CallerId, SwapFee};
use carbon_amm::exchange::Exchange;
use carbon_amm::store::MemoryLedger;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Constant-product exchange (base × token = k) ===\n");

    let ledger = MemoryLedger::new();
    let exchange = Exchange::new(ExchangeConfig::new("pool", SwapFee::DEFAULT)?);
    let alice = CallerId::new("alice");
    let bob = CallerId::new("bob");
    let trader = CallerId::new("trader");

    // ── 1. Seed the token side, then the base side ─────────────────────
    let created = ledger.execute(alice.clone(), |tx| {
        exchange.create_pool(tx, &alice, &Amount::new(1_000_000))
    })?;
    println!("[{}] alice created the pool: {}", created.tx_id, created.outcome);

    let added = ledger.execute(alice.clone(), |tx| {
        exchange.add_liquidity(tx, &alice, &Amount::new(1_000_000))
    })?;
    println!("[{}] alice added liquidity: {}", added.tx_id, added.outcome);

    let added = ledger.execute(bob.clone(), |tx| {
        exchange.add_liquidity(tx, &bob, &Amount::new(250_000))
    })?;
    println!("[{}] bob added liquidity:   {}", added.tx_id, added.outcome);

    let reserves = ledger.execute(trader.clone(), |tx| exchange.get_reserves(&*tx))?;
    println!("\nReserves: {reserves}  (k = {})", reserves.product());

    // ── 2. Swap both ways ──────────────────────────────────────────────
    let sold_base = ledger.execute(trader.clone(), |tx| {
        exchange.swap_base_for_tokens(tx, &trader, &Amount::new(50_000))
    })?;
    println!("\n[{}] {}", sold_base.tx_id, sold_base.outcome);

    let sold_token = ledger.execute(trader.clone(), |tx| {
        exchange.swap_tokens_for_base(tx, &trader, sold_base.outcome.amount_out())
    })?;
    println!("[{}] {}", sold_token.tx_id, sold_token.outcome);

    let (reserves, fees) = ledger.execute(trader.clone(), |tx| {
        Ok((exchange.get_reserves(&*tx)?, exchange.get_fee_reserves(&*tx)?))
    })?;
    println!("Reserves after round trip: {reserves}  (k = {})", reserves.product());
    println!("Fee reserves:              {fees}");

    // ── 3. Rejections leave the pool untouched ─────────────────────────
    let rejected = ledger.execute(trader.clone(), |tx| {
        exchange.remove_all_liquidity(tx, &trader)
    });
    if let Err(err) = rejected {
        println!("\ntrader cannot withdraw: [{}] {err}", err.kind());
    }

    // ── 4. Redeem ──────────────────────────────────────────────────────
    let removed = ledger.execute(bob.clone(), |tx| exchange.remove_all_liquidity(tx, &bob))?;
    println!("\n[{}] bob withdrew: {}", removed.tx_id, removed.outcome);

    // ── 5. The string surface ──────────────────────────────────────────
    println!("\nDispatch surface:");
    for (name, args) in [
        ("GetReserves", &[][..]),
        ("GetSwapFee", &[][..]),
        ("GetProviders", &[][..]),
        ("SwapBaseForTokens", &["1000"][..]),
        ("RemoveLiquidity", &["-5"][..]),
    ] {
        let mut tx = ledger.begin(alice.clone())?;
        let response = handle(&exchange, &mut tx, name, args);
        if response.is_success() {
            tx.commit();
        }
        println!("  {name:<18} {args:?} -> {}", serde_json::to_string(&response)?);
    }

    Ok(())
}
