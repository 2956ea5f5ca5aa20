//! Property-based tests using `proptest` for pool invariant validation.
//!
//! 1. **Share conservation**: `total_shares == Σ lp_shares` after any
//!    sequence of deposits, withdrawals and evictions.
//! 2. **No free value**: a swap never decreases `base × token`.
//! 3. **Proportional redemption**: payouts never exceed the exact share.
//! 4. **Fee isolation**: fee reserves only grow, and only on the input side.
//! 5. **Read idempotence**: queries never change the pool.
//! 6. **Failure atomicity**: a rejected operation leaves the pool unchanged.

use proptest::prelude::*;

use super::Pool;
use crate::domain::{Amount, Asset, CallerId, Reserves, SwapFee};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const CALLERS: [&str; 4] = ["alice", "bob", "carol", "dave"];

fn caller(i: usize) -> CallerId {
    CallerId::new(CALLERS[i % CALLERS.len()])
}

/// A pool seeded through the public transitions with balanced liquidity.
fn seeded_pool(base: u128, token: u128) -> Pool {
    let mut pool = Pool::genesis(SwapFee::DEFAULT);
    let Ok(_) = pool.create(&caller(0), &Amount::new(token)) else {
        panic!("create");
    };
    let Ok(_) = pool.add_liquidity(&caller(1), &Amount::new(base)) else {
        panic!("seed base side");
    };
    pool
}

#[derive(Debug, Clone)]
enum Step {
    Add(usize, u128),
    Remove(usize, u128),
    RemoveAll(usize),
    Swap(Asset, u128),
    Evict(u64),
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserve values in range [10_000, 10_000_000] to avoid extremes.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    10_000u128..=10_000_000u128
}

fn asset_strategy() -> impl Strategy<Value = Asset> {
    prop_oneof![Just(Asset::Base), Just(Asset::Token)]
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (0usize..4, 1u128..100_000).prop_map(|(c, a)| Step::Add(c, a)),
        3 => (0usize..4, 1u128..100_000).prop_map(|(c, a)| Step::Remove(c, a)),
        1 => (0usize..4).prop_map(Step::RemoveAll),
        4 => (asset_strategy(), 1u128..100_000).prop_map(|(s, a)| Step::Swap(s, a)),
        1 => (0u64..6).prop_map(Step::Evict),
    ]
}

fn apply(pool: &mut Pool, step: &Step) -> bool {
    match *step {
        Step::Add(c, a) => pool.add_liquidity(&caller(c), &Amount::new(a)).is_ok(),
        Step::Remove(c, a) => pool.remove_liquidity(&caller(c), &Amount::new(a)).is_ok(),
        Step::RemoveAll(c) => pool.remove_all_liquidity(&caller(c)).is_ok(),
        Step::Swap(side, a) => pool.swap(side, &Amount::new(a)).is_ok(),
        Step::Evict(i) => pool.remove_provider(i).is_ok(),
    }
}

// ---------------------------------------------------------------------------
// Property 1 & 6: Share Conservation and Failure Atomicity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_share_conservation(
        base in reserve_strategy(),
        token in reserve_strategy(),
        steps in prop::collection::vec(step_strategy(), 1..40),
    ) {
        let mut pool = seeded_pool(base, token);
        for step in &steps {
            let before = pool.clone();
            let applied = apply(&mut pool, step);
            if !applied {
                prop_assert_eq!(&pool, &before, "rejected {:?} mutated the pool", step);
            }
            let check = pool.check_invariants();
            prop_assert!(check.is_ok(), "after {:?}: {:?}", step, check);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2 & 4: No Free Value and Fee Isolation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_swap_never_decreases_product(
        base in reserve_strategy(),
        token in reserve_strategy(),
        swaps in prop::collection::vec((asset_strategy(), 1u128..5_000_000), 1..10),
    ) {
        let mut pool = seeded_pool(base, token);
        for (side, amount) in swaps {
            let k_before = pool.reserves().product();
            let fees_before = pool.fee_reserves();
            let Ok(receipt) = pool.swap(side, &Amount::new(amount)) else {
                continue;
            };
            let k_after = pool.reserves().product();
            prop_assert!(k_after >= k_before, "k shrank: {} < {}", k_after, k_before);

            let fees_after = pool.fee_reserves();
            let expected = match side {
                Asset::Base => Reserves::new(&fees_before.base + receipt.fee(), fees_before.token.clone()),
                Asset::Token => Reserves::new(fees_before.base.clone(), &fees_before.token + receipt.fee()),
            };
            prop_assert_eq!(fees_after, expected);
        }
    }

    #[test]
    fn prop_round_trip_swap_loses_value(
        base in reserve_strategy(),
        token in reserve_strategy(),
        amount in 1u128..1_000_000,
    ) {
        let mut pool = seeded_pool(base, token);
        let Ok(first) = pool.swap(Asset::Base, &Amount::new(amount)) else {
            return Ok(());
        };
        let Ok(second) = pool.swap(Asset::Token, first.amount_out()) else {
            return Ok(());
        };
        prop_assert!(second.amount_out() <= &Amount::new(amount));
    }
}

// ---------------------------------------------------------------------------
// Property 3: Proportional Redemption
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_redemption_bounded_by_exact_share(
        base in reserve_strategy(),
        token in reserve_strategy(),
        deposit in 1u128..1_000_000,
        fraction in 1u128..=100,
    ) {
        let mut pool = seeded_pool(base, token);
        let lp = caller(2);
        let Ok(_) = pool.add_liquidity(&lp, &Amount::new(deposit)) else {
            return Ok(());
        };
        let held = pool.shares_of(&lp);
        let Some(redeem) = (&held * &Amount::new(fraction)).checked_div(&Amount::new(100)) else {
            return Ok(());
        };
        if redeem.is_zero() {
            return Ok(());
        }

        let reserves = pool.reserves();
        let total = pool.total_shares().clone();
        let Ok(change) = pool.remove_liquidity(&lp, &redeem) else {
            return Ok(());
        };

        // out × total ≤ shares × reserve
        prop_assert!(&change.base * &total <= &redeem * &reserves.base);
        prop_assert!(&change.token * &total <= &redeem * &reserves.token);
    }

    #[test]
    fn prop_full_withdrawal_round_trip(
        base in reserve_strategy(),
        token in reserve_strategy(),
    ) {
        let mut pool = seeded_pool(base, token);
        for i in 0..2 {
            let Ok(_) = pool.remove_all_liquidity(&caller(i)) else {
                panic!("holder {} withdraws", i);
            };
        }
        prop_assert!(pool.is_uninitialized());
        prop_assert!(pool.total_shares().is_zero());
    }
}

// ---------------------------------------------------------------------------
// Property 5: Read Idempotence
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_reads_do_not_mutate(
        base in reserve_strategy(),
        token in reserve_strategy(),
        amount in 1u128..1_000_000,
    ) {
        let pool = seeded_pool(base, token);
        let snapshot = pool.clone();
        let first = (pool.reserves(), pool.swap_fee(), pool.fee_reserves());
        let _ = pool.quote(Asset::Token, &Amount::new(amount));
        let second = (pool.reserves(), pool.swap_fee(), pool.fee_reserves());
        prop_assert_eq!(first, second);
        prop_assert_eq!(pool, snapshot);
    }
}
