//! Property-based tests for order book invariants
//!
//! Verifies under arbitrary operation sequences that:
//!
//! - Price-time priority decides fill order
//! - Level aggregates equal the sum of their orders
//! - Cached best and worst prices match the price index
//! - Rejected intents leave the book untouched
//! - Replaying an intent stream reproduces the state root

use std::collections::HashMap;

use lob_core::{Intent, LimitOrderBook, Side};
use proptest::prelude::*;

fn arb_price() -> impl Strategy<Value = u64> {
    1_000u64..1_100u64
}

fn arb_quantity() -> impl Strategy<Value = u64> {
    1u64..10_000u64
}

fn arb_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Bid), Just(Side::Ask)]
}

/// Intents over a small id space so cancels and amends often hit
fn arb_intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        4 => (arb_side(), 1u64..64, arb_price(), arb_quantity())
            .prop_map(|(side, id, price, size)| Intent::Limit { side, id, price, size }),
        2 => (arb_side(), 1u64..64, arb_quantity())
            .prop_map(|(side, id, size)| Intent::Market { side, id, size }),
        2 => (arb_side(), 1u64..64).prop_map(|(side, id)| Intent::Cancel { side, id }),
        1 => (
            arb_side(),
            1u64..64,
            proptest::option::of(arb_quantity()),
            proptest::option::of(arb_price()),
        )
            .prop_map(|(side, id, new_size, new_price)| Intent::Amend { side, id, new_size, new_price }),
    ]
}

mod structural_invariants {
    use super::*;

    proptest! {
        #[test]
        fn prop_invariants_hold_after_every_intent(intents in prop::collection::vec(arb_intent(), 1..200)) {
            let mut book = LimitOrderBook::new();
            for intent in intents {
                let _ = book.apply(intent);
                prop_assert_eq!(book.check_invariants(), Ok(()));
            }
        }

        #[test]
        fn prop_best_is_extreme_of_resting_prices(
            orders in prop::collection::vec((arb_side(), arb_price(), arb_quantity()), 1..100)
        ) {
            let mut book = LimitOrderBook::new();
            for (id, (side, price, size)) in orders.iter().enumerate() {
                book.submit_limit(*side, id as u64, *price, *size).unwrap();
            }

            let bids = orders.iter().filter(|o| o.0 == Side::Bid).map(|o| o.1);
            let asks = orders.iter().filter(|o| o.0 == Side::Ask).map(|o| o.1);
            prop_assert_eq!(book.best_bid(), bids.clone().max());
            prop_assert_eq!(book.side(Side::Bid).worst(), bids.min());
            prop_assert_eq!(book.best_ask(), asks.clone().min());
            prop_assert_eq!(book.side(Side::Ask).worst(), asks.max());
        }

        #[test]
        fn prop_depth_is_sum_of_member_sizes(
            orders in prop::collection::vec((arb_price(), arb_quantity()), 1..100)
        ) {
            let mut book = LimitOrderBook::new();
            let mut expected: HashMap<u64, u64> = HashMap::new();
            for (id, (price, size)) in orders.iter().enumerate() {
                book.submit_limit(Side::Ask, id as u64, *price, *size).unwrap();
                *expected.entry(*price).or_default() += size;
            }

            for (price, total) in expected {
                prop_assert_eq!(book.depth_at(Side::Ask, price), total);
                let members: u64 = book.side(Side::Ask).orders_at(price).iter().map(|o| o.remaining).sum();
                prop_assert_eq!(members, total);
            }
        }

        #[test]
        fn prop_cancel_all_empties_book(
            orders in prop::collection::vec((arb_side(), arb_price(), arb_quantity()), 0..100)
        ) {
            let mut book = LimitOrderBook::new();
            for (id, (side, price, size)) in orders.iter().enumerate() {
                book.submit_limit(*side, id as u64, *price, *size).unwrap();
            }
            for (id, (side, _, _)) in orders.iter().enumerate() {
                book.cancel(*side, id as u64).unwrap();
            }

            prop_assert!(book.is_empty());
            prop_assert_eq!(book.best_bid(), None);
            prop_assert_eq!(book.best_ask(), None);
            prop_assert_eq!(book.side(Side::Bid).level_count(), 0);
            prop_assert_eq!(book.side(Side::Ask).level_count(), 0);
        }
    }
}

mod priority_invariants {
    use super::*;

    proptest! {
        #[test]
        fn prop_same_price_fills_in_arrival_order(
            sizes in prop::collection::vec(arb_quantity(), 1..50),
            take in 1u64..500_000u64,
        ) {
            let mut book = LimitOrderBook::new();
            for (id, size) in sizes.iter().enumerate() {
                book.submit_limit(Side::Bid, id as u64, 1_000, *size).unwrap();
            }

            let report = book.submit_market(Side::Ask, 10_000, take).unwrap();

            let makers: Vec<u64> = report.fills.iter().map(|f| f.maker_order_id).collect();
            let expected: Vec<u64> = (0..makers.len() as u64).collect();
            prop_assert_eq!(makers, expected);
            prop_assert_eq!(report.matched + report.unfilled, take);
            prop_assert_eq!(report.matched, take.min(sizes.iter().sum()));
        }

        #[test]
        fn prop_market_fills_never_worsen_in_price(
            orders in prop::collection::vec((arb_price(), arb_quantity()), 1..100),
            take in 1u64..500_000u64,
        ) {
            let mut book = LimitOrderBook::new();
            for (id, (price, size)) in orders.iter().enumerate() {
                book.submit_limit(Side::Ask, id as u64, *price, *size).unwrap();
            }

            let report = book.submit_market(Side::Bid, 10_000, take).unwrap();

            prop_assert!(report.fills.windows(2).all(|w| w[0].price <= w[1].price));
            if let (Some(last), Some(best)) = (report.fills.last(), book.best_ask()) {
                prop_assert!(last.price <= best);
            }
        }
    }
}

mod atomicity {
    use super::*;

    proptest! {
        #[test]
        fn prop_duplicate_leaves_original_unchanged(
            side in arb_side(),
            price in arb_price(),
            size in arb_quantity(),
            other_price in arb_price(),
            other_size in arb_quantity(),
        ) {
            let mut book = LimitOrderBook::new();
            book.submit_limit(side, 7, price, size).unwrap();
            let root = book.state_root().unwrap();

            prop_assert!(book.submit_limit(side, 7, other_price, other_size).is_err());

            prop_assert_eq!(book.state_root().unwrap(), root);
            let order = book.order(side, 7).unwrap();
            prop_assert_eq!(order.price(), Some(price));
            prop_assert_eq!(order.remaining, size);
        }

        #[test]
        fn prop_rejection_never_changes_state(intents in prop::collection::vec(arb_intent(), 1..100)) {
            let mut book = LimitOrderBook::new();
            for intent in intents {
                let root = book.state_root().unwrap();
                let sequence = book.sequence();
                if book.apply(intent).is_err() {
                    prop_assert_eq!(book.state_root().unwrap(), root);
                    prop_assert_eq!(book.sequence(), sequence);
                }
            }
        }

        #[test]
        fn prop_replay_reproduces_state_root(intents in prop::collection::vec(arb_intent(), 1..150)) {
            let mut first = LimitOrderBook::new();
            let mut second = LimitOrderBook::new();
            for intent in &intents {
                let a = first.apply(*intent);
                let b = second.apply(*intent);
                prop_assert_eq!(a, b);
            }
            prop_assert_eq!(first.state_root().unwrap(), second.state_root().unwrap());
        }
    }
}
