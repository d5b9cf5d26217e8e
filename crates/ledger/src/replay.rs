//! Replay helpers: rebuild and audit stock from a movement history.
//!
//! The ledger is the source of truth for *how* stock got where it is; the
//! product row is a denormalized summary. These helpers recompute the
//! summary from the trail so drift between the two becomes detectable.

use stockbook_core::LedgerError;

use crate::movement::Movement;

/// Final stock implied by an ordered history (the last `stock_after`).
///
/// `None` for an empty history: a product with no movements has whatever
/// stock it was created with, which the ledger cannot know.
pub fn final_stock(history: &[Movement]) -> Option<i64> {
    history.last().map(|movement| movement.stock_after)
}

/// Verify the ledger chain over one product's history in insertion order.
///
/// Each movement must continue where the previous one left off
/// (`stock_before == previous stock_after`) and carry consistent
/// arithmetic (`stock_after == stock_before + quantity`). Returns a
/// `Validation` error describing the first break.
pub fn verify_chain(history: &[Movement]) -> Result<(), LedgerError> {
    let mut previous_after: Option<i64> = None;

    for movement in history {
        // checked_add: an overflowing row is broken arithmetic, not a panic.
        let implied_after = movement.stock_before.checked_add(movement.quantity);
        if implied_after != Some(movement.stock_after) {
            return Err(LedgerError::validation(format!(
                "chain arithmetic broken at sequence {}: {} + {} != {}",
                movement.sequence, movement.stock_before, movement.quantity, movement.stock_after
            )));
        }
        if let Some(previous) = previous_after {
            if movement.stock_before != previous {
                return Err(LedgerError::validation(format!(
                    "chain continuity broken at sequence {}: stock_before {} != previous stock_after {}",
                    movement.sequence, movement.stock_before, previous
                )));
            }
        }
        previous_after = Some(movement.stock_after);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::MovementType;
    use chrono::Utc;
    use stockbook_core::{MovementId, ProductId, UserId};

    fn chain_from(initial: i64, deltas: &[i64]) -> Vec<Movement> {
        let product_id = ProductId::new();
        let user_id = UserId::new();
        let mut stock = initial;

        deltas
            .iter()
            .enumerate()
            .map(|(position, delta)| {
                let movement_type = if *delta > 0 {
                    MovementType::AdjustmentAdd
                } else {
                    MovementType::AdjustmentRemove
                };
                let movement = Movement {
                    id: MovementId::new(),
                    sequence: position as u64 + 1,
                    product_id,
                    product_name: "Saline 0.9%".to_string(),
                    movement_type,
                    quantity: *delta,
                    stock_before: stock,
                    stock_after: stock + delta,
                    movement_date: Utc::now(),
                    user_id,
                    user_name: "kchen".to_string(),
                    batch_expiry_date: None,
                    notes: None,
                    related_order_id: None,
                    is_reverted: false,
                    reverted_from_id: None,
                };
                stock += delta;
                movement
            })
            .collect()
    }

    #[test]
    fn empty_history_has_no_final_stock() {
        assert_eq!(final_stock(&[]), None);
        assert!(verify_chain(&[]).is_ok());
    }

    #[test]
    fn intact_chain_verifies_and_replays() {
        let history = chain_from(10, &[20, -5, 3]);
        assert!(verify_chain(&history).is_ok());
        assert_eq!(final_stock(&history), Some(28));
    }

    #[test]
    fn arithmetic_break_is_reported() {
        let mut history = chain_from(10, &[20, -5]);
        history[1].stock_after += 1;

        match verify_chain(&history) {
            Err(LedgerError::Validation(msg)) => {
                assert!(msg.contains("arithmetic"), "unexpected message: {msg}")
            }
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn overflowing_row_reads_as_broken_arithmetic() {
        let mut history = chain_from(10, &[20]);
        history[0].stock_before = i64::MAX;
        history[0].quantity = 1;

        match verify_chain(&history) {
            Err(LedgerError::Validation(msg)) => {
                assert!(msg.contains("arithmetic"), "unexpected message: {msg}")
            }
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn continuity_break_is_reported() {
        let mut history = chain_from(10, &[20, -5]);
        history[1].stock_before += 2;
        history[1].stock_after += 2;

        match verify_chain(&history) {
            Err(LedgerError::Validation(msg)) => {
                assert!(msg.contains("continuity"), "unexpected message: {msg}")
            }
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                // Use deterministic seed for CI reproducibility
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: a chain built from any run of non-zero deltas
            /// verifies, and its replayed stock equals initial + sum.
            #[test]
            fn built_chains_verify_and_replay(
                initial in 0i64..10_000,
                deltas in proptest::collection::vec((-500i64..500).prop_filter("non-zero", |d| *d != 0), 1..40)
            ) {
                let history = chain_from(initial, &deltas);
                let expected: i64 = initial + deltas.iter().sum::<i64>();

                prop_assert!(verify_chain(&history).is_ok());
                prop_assert_eq!(final_stock(&history), Some(expected));
            }

            /// Property: corrupting any single stock_after breaks the chain.
            #[test]
            fn corruption_is_always_detected(
                initial in 0i64..1_000,
                deltas in proptest::collection::vec((1i64..100).prop_map(|d| d * 2 - 101), 2..20),
                victim in 0usize..19,
                bump in 1i64..50
            ) {
                let mut history = chain_from(initial, &deltas);
                let victim = victim % history.len();
                history[victim].stock_after += bump;

                prop_assert!(verify_chain(&history).is_err());
            }
        }
    }
}
