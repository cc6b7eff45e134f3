//! Property-based tests for LedgerService.
//!
//! - Ledger correctness: each balance_after is the cumulative signed sum
//! - Soft-delete exclusion: chaining skips removed tails
//! - Rebalance repairs any stale chain

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::entry::TransactionType;
use super::service::LedgerService;
use super::types::{ChainEntry, TransactionDraft};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn transaction_type_strategy() -> impl Strategy<Value = TransactionType> {
    prop_oneof![Just(TransactionType::Credit), Just(TransactionType::Debit)]
}

/// (day offset increment, type, amount) triples; increments of zero create same-day ties.
fn movements(max_len: usize) -> impl Strategy<Value = Vec<(i64, TransactionType, Decimal)>> {
    prop::collection::vec(
        (0i64..3, transaction_type_strategy(), positive_amount()),
        1..=max_len,
    )
}

/// Appends each movement in chronological order, the way the repository does.
fn build_chain(moves: &[(i64, TransactionType, Decimal)]) -> Vec<ChainEntry> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut date = start;
    let mut chain: Vec<ChainEntry> = Vec::with_capacity(moves.len());

    for (i, (step, transaction_type, amount)) in moves.iter().enumerate() {
        date += Duration::days(*step);
        let draft = TransactionDraft {
            date,
            payee: "Supplier".to_string(),
            transaction_type: *transaction_type,
            amount: *amount,
        };
        let rb = LedgerService::chain_onto(&draft, LedgerService::tail(&chain)).unwrap();
        chain.push(ChainEntry {
            id: i32::try_from(i).unwrap() + 1,
            date,
            transaction_type: *transaction_type,
            amount: *amount,
            balance_after: rb.balance_after,
        });
    }

    chain
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The i-th balance_after equals the signed sum of amounts 1..=i.
    #[test]
    fn prop_balance_is_cumulative_sum(moves in movements(25)) {
        let chain = build_chain(&moves);

        let mut expected = Decimal::ZERO;
        for (entry, (_, transaction_type, amount)) in chain.iter().zip(moves.iter()) {
            expected += transaction_type.signed_amount(*amount);
            prop_assert_eq!(entry.balance_after, expected);
        }
    }

    /// A chain built by appending needs no corrections.
    #[test]
    fn prop_appended_chain_is_consistent(moves in movements(25)) {
        let chain = build_chain(&moves);
        prop_assert!(LedgerService::rebalance(&chain).is_empty());
        prop_assert_eq!(
            LedgerService::summarize(&chain).current_balance,
            chain.last().map(|e| e.balance_after).unwrap()
        );
    }

    /// Dropping the tail (soft delete) makes the next record chain onto the one before.
    #[test]
    fn prop_soft_deleted_tail_is_skipped(
        moves in movements(10),
        amount in positive_amount(),
    ) {
        prop_assume!(moves.len() >= 2);
        let mut chain = build_chain(&moves);
        chain.pop();
        let new_tail = chain.last().cloned().unwrap();

        let draft = TransactionDraft {
            date: new_tail.date + Duration::days(30),
            payee: "Client".to_string(),
            transaction_type: TransactionType::Credit,
            amount,
        };
        let rb = LedgerService::chain_onto(&draft, LedgerService::tail(&chain)).unwrap();
        prop_assert_eq!(rb.previous_balance, new_tail.balance_after);
        prop_assert_eq!(rb.balance_after, new_tail.balance_after + amount);
    }

    /// Editing an early amount leaves later rows stale; rebalance reports them all.
    #[test]
    fn prop_rebalance_repairs_mid_chain_edit(
        moves in movements(15),
        new_amount in positive_amount(),
    ) {
        prop_assume!(moves.len() >= 2);
        let mut chain = build_chain(&moves);
        let delta = new_amount - chain[0].amount;
        prop_assume!(!delta.is_zero());

        chain[0].amount = new_amount;
        chain[0].balance_after = chain[0].transaction_type.signed_amount(new_amount);

        let corrections = LedgerService::rebalance(&chain);
        prop_assert_eq!(corrections.len(), chain.len() - 1);
        for correction in &corrections {
            let row = chain.iter().find(|e| e.id == correction.id).unwrap();
            let shift = chain[0].transaction_type.signed_amount(delta);
            prop_assert_eq!(correction.expected, row.balance_after + shift);
        }
    }
}
