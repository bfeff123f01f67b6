//! Property-based tests for order book invariants
//!
//! After every accepted operation the book must satisfy:
//!
//! - side price monotonicity (bids strictly descending, asks strictly
//!   ascending)
//! - cached level volume equals the sum of queued remaining quantities
//! - the order index holds exactly the linked order ids
//! - pool occupancy equals the index size
//! - every resting order has positive remaining quantity

use common::{Px, Qty, Side};
use lob::{BookConfig, OrderBook};
use proptest::prelude::*;
use quickcheck::{quickcheck, TestResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Invariant checker
// ---------------------------------------------------------------------------

fn check_invariants(book: &OrderBook) {
    // 1. Strict monotonicity per side
    for pair in book.bids().windows(2) {
        assert!(
            pair[0].price > pair[1].price,
            "bid levels not strictly descending: {} then {}",
            pair[0].price,
            pair[1].price
        );
    }
    for pair in book.asks().windows(2) {
        assert!(
            pair[0].price < pair[1].price,
            "ask levels not strictly ascending: {} then {}",
            pair[0].price,
            pair[1].price
        );
    }

    let mut linked_ids = HashSet::new();
    for level in book.bids().iter().chain(book.asks().iter()) {
        // 2. Cached volume equals the sum over the queue
        let queued: u64 = level.orders(book.pool()).map(|o| o.qty.as_u64()).sum();
        assert_eq!(level.total_volume(), queued, "volume drift at {}", level.price);
        assert!(!level.is_empty(), "empty level left in side at {}", level.price);

        for order in level.orders(book.pool()) {
            // 5. Positive remaining quantity
            assert!(!order.qty.is_zero(), "zero-qty order {} resting", order.id);
            assert_eq!(order.price, level.price);
            assert!(linked_ids.insert(order.id), "order {} linked twice", order.id);

            // 3. Index maps each linked id to the same record
            let indexed = book
                .resting_order(order.id)
                .unwrap_or_else(|| panic!("linked order {} missing from index", order.id));
            assert_eq!(indexed.id, order.id);
            assert_eq!(indexed.price, order.price);
            assert_eq!(indexed.qty, order.qty);
            assert_eq!(indexed.side, order.side);
        }
    }

    // 3./4. Index contains exactly the linked ids; pool matches
    assert_eq!(book.order_count(), linked_ids.len());
    assert_eq!(book.pool().allocated(), book.order_count());
}

/// Snapshot of externally observable book state
type LevelSnapshot = Vec<(u64, Vec<(u64, u32)>)>;

fn snapshot_side(book: &OrderBook, side: Side) -> LevelSnapshot {
    let levels = match side {
        Side::Buy => book.bids(),
        Side::Sell => book.asks(),
    };
    levels
        .iter()
        .map(|level| {
            (
                level.price.as_ticks(),
                level
                    .orders(book.pool())
                    .map(|o| (o.id, o.qty.as_u32()))
                    .collect(),
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Proptest strategies
// ---------------------------------------------------------------------------

fn arb_price() -> impl Strategy<Value = u64> {
    // Narrow tick range so levels collide and matching happens
    (90u64..=110).prop_map(|p| p * 10_000)
}

fn arb_qty() -> impl Strategy<Value = u32> {
    1u32..500
}

fn arb_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Buy), Just(Side::Sell)]
}

#[derive(Debug, Clone)]
enum Op {
    Add { id: u64, price: u64, qty: u32, side: Side },
    Cancel { id: u64 },
    Execute { id: u64, qty: u32 },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u64..64, arb_price(), arb_qty(), arb_side())
            .prop_map(|(id, price, qty, side)| Op::Add { id, price, qty, side }),
        (1u64..64).prop_map(|id| Op::Cancel { id }),
        (1u64..64, 1u32..200).prop_map(|(id, qty)| Op::Execute { id, qty }),
    ]
}

fn apply(book: &mut OrderBook, op: &Op) {
    match *op {
        Op::Add { id, price, qty, side } => {
            book.add_order(id, Px::from_ticks(price), Qty::new(qty), side);
        }
        Op::Cancel { id } => {
            book.cancel_order(id);
        }
        Op::Execute { id, qty } => {
            book.execute_order(id, Qty::new(qty));
        }
    }
}

// ---------------------------------------------------------------------------
// Invariants under random operation sequences
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_invariants_hold_under_random_ops(ops in prop::collection::vec(arb_op(), 1..200)) {
        let mut book = OrderBook::with_capacity(256);
        for op in &ops {
            apply(&mut book, op);
            check_invariants(&book);
        }
    }

    #[test]
    fn prop_add_then_cancel_restores_state(
        ops in prop::collection::vec(arb_op(), 0..100),
        price in arb_price(),
        qty in arb_qty(),
    ) {
        let mut book = OrderBook::with_capacity(256);
        for op in &ops {
            apply(&mut book, op);
        }

        // A buy below every ask neither crosses nor disturbs the match
        let safe_price = match book.best_ask() {
            Some(ask) => ask.as_ticks().saturating_sub(10_000).max(1),
            None => price,
        };

        let bids_before = snapshot_side(&book, Side::Buy);
        let asks_before = snapshot_side(&book, Side::Sell);
        let count_before = book.order_count();

        let fresh_id = 1_000_000; // outside the op id range
        prop_assume!(book.add_order(fresh_id, Px::from_ticks(safe_price), Qty::new(qty), Side::Buy));
        prop_assert!(book.cancel_order(fresh_id));

        prop_assert_eq!(snapshot_side(&book, Side::Buy), bids_before);
        prop_assert_eq!(snapshot_side(&book, Side::Sell), asks_before);
        prop_assert_eq!(book.order_count(), count_before);
        check_invariants(&book);
    }

    #[test]
    fn prop_matching_conserves_taker_quantity(
        makers in prop::collection::vec((arb_price(), arb_qty()), 1..20),
        taker_price in arb_price(),
        taker_qty in 1u32..5000,
    ) {
        let mut book = OrderBook::with_capacity(64);
        for (i, &(price, qty)) in makers.iter().enumerate() {
            book.add_order(i as u64 + 1, Px::from_ticks(price), Qty::new(qty), Side::Buy);
        }

        let taker_id = 9999;
        let mut filled: u64 = 0;
        let accepted = book.add_order_with(
            taker_id,
            Px::from_ticks(taker_price),
            Qty::new(taker_qty),
            Side::Sell,
            |exec| filled += exec.qty.as_u64(),
        );
        prop_assume!(accepted);

        let resting_after = book.resting_order(taker_id).map_or(0, |o| o.qty.as_u64());
        prop_assert_eq!(filled, u64::from(taker_qty) - resting_after);
        check_invariants(&book);
    }

    #[test]
    fn prop_executions_use_maker_price_and_fifo(
        maker_qtys in prop::collection::vec(arb_qty(), 1..10),
        taker_qty in 1u32..5000,
    ) {
        let price = Px::from_ticks(1_000_000);
        let mut book = OrderBook::with_capacity(64);
        for (i, &qty) in maker_qtys.iter().enumerate() {
            book.add_order(i as u64 + 1, price, Qty::new(qty), Side::Buy);
        }

        let mut fills = Vec::new();
        book.add_order_with(500, Px::from_ticks(1), Qty::new(taker_qty), Side::Sell, |exec| {
            fills.push(*exec);
        });

        for fill in &fills {
            prop_assert_eq!(fill.price, price);
            prop_assert_eq!(fill.maker_side, Side::Buy);
            prop_assert_eq!(fill.taker_id, 500);
        }

        // Fills walk makers strictly oldest-first
        let makers_seen: Vec<u64> = fills.iter().map(|f| f.maker_id).collect();
        let expected: Vec<u64> = (1..=makers_seen.len() as u64).collect();
        prop_assert_eq!(makers_seen, expected);
        check_invariants(&book);
    }
}

// ---------------------------------------------------------------------------
// QuickCheck sequences
// ---------------------------------------------------------------------------

#[cfg(test)]
mod quickcheck_tests {
    use super::*;

    fn qc_book() -> OrderBook {
        OrderBook::with_capacity(128)
    }

    quickcheck! {
        fn qc_cancel_everything_empties_book(orders: Vec<(u64, u16, u16, bool)>) -> TestResult {
            if orders.is_empty() || orders.len() > 64 {
                return TestResult::discard();
            }

            let mut book = qc_book();
            let mut added = HashSet::new();
            for &(id, price, qty, is_buy) in &orders {
                if price == 0 || qty == 0 {
                    continue;
                }
                let side = if is_buy { Side::Buy } else { Side::Sell };
                if book.add_order(id, Px::from_ticks(u64::from(price)), Qty::new(u32::from(qty)), side) {
                    added.insert(id);
                }
            }

            for id in &added {
                // Resting orders cancel exactly once; matched ones are gone
                if book.resting_order(*id).is_some() {
                    assert!(book.cancel_order(*id));
                }
                assert!(!book.cancel_order(*id));
            }

            assert!(book.is_empty());
            assert_eq!(book.pool().allocated(), 0);
            TestResult::passed()
        }

        fn qc_spread_consistent_with_bbo(orders: Vec<(u64, u16, u16, bool)>) -> TestResult {
            if orders.len() > 64 {
                return TestResult::discard();
            }

            let mut book = qc_book();
            for &(id, price, qty, is_buy) in &orders {
                if price == 0 || qty == 0 {
                    continue;
                }
                let side = if is_buy { Side::Buy } else { Side::Sell };
                book.add_order(id, Px::from_ticks(u64::from(price)), Qty::new(u32::from(qty)), side);

                match (book.best_bid(), book.best_ask()) {
                    (Some(bid), Some(ask)) => {
                        // Matching keeps the book uncrossed
                        assert!(ask > bid, "crossed book: {bid} / {ask}");
                        assert_eq!(book.spread(), Some(ask.as_ticks() - bid.as_ticks()));
                    }
                    _ => assert_eq!(book.spread(), None),
                }
            }
            check_invariants(&book);
            TestResult::passed()
        }
    }
}

// ---------------------------------------------------------------------------
// Level-vector growth across reallocation thresholds
// ---------------------------------------------------------------------------

#[test]
fn side_growth_across_reallocation_keeps_linkage_valid() {
    // Start with a deliberately tiny level reserve so the side vectors
    // reallocate many times while orders are resting
    let mut book = OrderBook::with_config(&BookConfig {
        pool_capacity: 8192,
        level_capacity: 1,
    });

    let mut rng = StdRng::seed_from_u64(42);
    let mut prices: Vec<u64> = (1..=2000u64).map(|p| p * 100).collect();
    prices.shuffle(&mut rng);

    for (i, &price) in prices.iter().enumerate() {
        let side = if price % 200 == 0 { Side::Buy } else { Side::Sell };
        // Keep sides apart so nothing crosses: buys low, sells high
        let ticks = match side {
            Side::Buy => price,
            Side::Sell => price + 1_000_000,
        };
        assert!(book.add_order(i as u64 + 1, Px::from_ticks(ticks), Qty::new(10), side));
    }
    check_invariants(&book);
    assert_eq!(book.order_count(), 2000);
    assert!(book.bid_level_count() > 1);
    assert!(book.ask_level_count() > 1);

    // Unlink in random order through the queues the reallocations moved
    let mut ids: Vec<u64> = (1..=2000).collect();
    ids.shuffle(&mut rng);
    for (n, id) in ids.iter().enumerate() {
        assert!(book.cancel_order(*id));
        if n % 257 == 0 {
            check_invariants(&book);
        }
    }

    assert!(book.is_empty());
    assert_eq!(book.pool().allocated(), 0);
}

#[test]
fn randomized_soak_maintains_invariants() {
    let mut book = OrderBook::with_capacity(512);
    let mut rng = StdRng::seed_from_u64(7);
    let mut next_id = 1u64;

    for step in 0..5000 {
        match rng.gen_range(0..10) {
            0..=5 => {
                let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
                let price = rng.gen_range(90u64..=110) * 10_000;
                let qty = rng.gen_range(1u32..300);
                book.add_order(next_id, Px::from_ticks(price), Qty::new(qty), side);
                next_id += 1;
            }
            6..=8 => {
                let id = rng.gen_range(0..next_id.max(2));
                book.cancel_order(id);
            }
            _ => {
                let id = rng.gen_range(0..next_id.max(2));
                book.execute_order(id, Qty::new(rng.gen_range(1u32..100)));
            }
        }
        if step % 100 == 0 {
            check_invariants(&book);
        }
    }
    check_invariants(&book);
}
