//! Ledger service for running-balance computation.
//!
//! This module provides the pure business logic that the fund transaction
//! repository runs between reading the chain tail and writing the record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance::{LedgerSummary, RunningBalance};
use super::error::LedgerError;
use super::types::{ChainEntry, TransactionDraft};
use super::validation::validate_draft;

/// A stored balance that disagrees with the recomputed chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceCorrection {
    /// Transaction to fix.
    pub id: i32,
    /// Value currently stored.
    pub stored: Decimal,
    /// Value implied by the chain.
    pub expected: Decimal,
}

/// Ledger service for fund transactions.
///
/// This service contains pure business logic with no database dependencies.
pub struct LedgerService;

impl LedgerService {
    /// Validates a draft and chains it onto the current tail.
    ///
    /// `tail` is the latest active transaction of the project by
    /// (date DESC, id DESC), excluding the transaction being written.
    /// Without a tail the previous balance is zero.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the draft is invalid.
    pub fn chain_onto(
        draft: &TransactionDraft,
        tail: Option<&ChainEntry>,
    ) -> Result<RunningBalance, LedgerError> {
        validate_draft(draft)?;

        Ok(RunningBalance::chained(
            tail.map(|entry| entry.balance_after),
            draft.signed_amount(),
        ))
    }

    /// Recomputes a chain from zero and reports every stored balance that is stale.
    ///
    /// The chain is ordered by (date, id) before replaying, so callers may pass
    /// it in any order.
    #[must_use]
    pub fn rebalance(chain: &[ChainEntry]) -> Vec<BalanceCorrection> {
        let mut ordered: Vec<&ChainEntry> = chain.iter().collect();
        ordered.sort_by_key(|entry| entry.order_key());

        let mut corrections = Vec::new();
        let mut running = Decimal::ZERO;

        for entry in ordered {
            running += entry.transaction_type.signed_amount(entry.amount);
            if entry.balance_after != running {
                corrections.push(BalanceCorrection {
                    id: entry.id,
                    stored: entry.balance_after,
                    expected: running,
                });
            }
        }

        corrections
    }

    /// Summarises a chain given in chain order.
    #[must_use]
    pub fn summarize(chain: &[ChainEntry]) -> LedgerSummary {
        LedgerSummary::from_chain(chain)
    }

    /// Returns the tail of a chain: the entry with the greatest (date, id).
    #[must_use]
    pub fn tail(chain: &[ChainEntry]) -> Option<&ChainEntry> {
        chain.iter().max_by_key(|entry| entry.order_key())
    }
}
