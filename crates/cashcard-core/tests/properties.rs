//! Property-Based Tests for Paging
//!
//! These tests check that listing pages behave for arbitrary inputs:
//! 1. A page never holds more than `size` cards
//! 2. Pages are ordered under the requested sort
//! 3. Walking every page visits each card exactly once
//! 4. Lenient query parsing always yields a usable request
//!
//! Uses proptest for property-based testing with arbitrary inputs.

use cashcard_core::{CashCard, Direction, PageDefaults, PageRequest, SortField, SortOrder};
use proptest::prelude::*;
use std::cmp::Ordering;

fn arb_cards() -> impl Strategy<Value = Vec<CashCard>> {
    prop::collection::vec((-1_000_000i64..1_000_000, "[a-z]{1,6}"), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (cents, owner))| CashCard::new(i as i64 + 1, cents as f64 / 100.0, owner))
            .collect()
    })
}

fn arb_order() -> impl Strategy<Value = SortOrder> {
    (
        prop_oneof![
            Just(SortField::Id),
            Just(SortField::Amount),
            Just(SortField::Owner)
        ],
        prop_oneof![Just(Direction::Asc), Just(Direction::Desc)],
    )
        .prop_map(|(field, direction)| SortOrder::new(field, direction))
}

// =============================================================================
// PAGE BOUNDS
// =============================================================================

proptest! {
    /// A page is never larger than its size and never larger than what remains
    #[test]
    fn prop_page_respects_size(
        cards in arb_cards(),
        page in 0usize..10,
        size in 1usize..15,
    ) {
        let total = cards.len();
        let request = PageRequest::new(page, size);
        let result = request.apply(cards);

        prop_assert!(result.len() <= size);
        prop_assert_eq!(result.len(), total.saturating_sub(page * size).min(size));
    }

    /// Every card shows up on exactly one page
    #[test]
    fn prop_pages_partition_cards(
        cards in arb_cards(),
        size in 1usize..7,
        order in arb_order(),
    ) {
        let mut seen: Vec<i64> = Vec::new();
        let pages = cards.len() / size + 1;

        for page in 0..pages {
            let request = PageRequest::new(page, size).with_sort(vec![order]);
            seen.extend(request.apply(cards.clone()).iter().map(|c| c.id));
        }

        let mut expected: Vec<i64> = cards.iter().map(|c| c.id).collect();
        expected.sort_unstable();
        seen.sort_unstable();
        prop_assert_eq!(seen, expected);
    }
}

// =============================================================================
// ORDERING
// =============================================================================

proptest! {
    /// Adjacent cards in a page never violate the requested order
    #[test]
    fn prop_page_is_sorted(
        cards in arb_cards(),
        orders in prop::collection::vec(arb_order(), 1..3),
    ) {
        let request = PageRequest::new(0, cards.len().max(1)).with_sort(orders);
        let page = request.apply(cards);

        for pair in page.windows(2) {
            prop_assert_ne!(request.compare(&pair[0], &pair[1]), Ordering::Greater);
        }
    }

    /// The default order is amount descending
    #[test]
    fn prop_default_order_is_amount_desc(cards in arb_cards()) {
        let page = PageRequest::default().apply(cards);

        for pair in page.windows(2) {
            prop_assert!(pair[0].amount >= pair[1].amount);
        }
    }
}

// =============================================================================
// LENIENT PARSING
// =============================================================================

proptest! {
    /// Whatever arrives in the query string, the request is bounded and sorted
    #[test]
    fn prop_from_query_always_usable(
        page in ".{0,8}",
        size in ".{0,8}",
        sort in ".{0,16}",
    ) {
        let defaults = PageDefaults::default();
        let params = [("page", page), ("size", size), ("sort", sort)];
        let request = PageRequest::from_query(params, &defaults);

        prop_assert!(request.size >= 1);
        prop_assert!(request.size <= defaults.max_size);
        prop_assert!(!request.sort.is_empty());
    }
}
