//! Running balance calculations for a project's fund chain.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::TransactionType;
use super::types::ChainEntry;

/// Balance before and after one transaction of the chain.
///
/// - previous_balance: balance_after of the preceding active transaction, or zero
/// - balance_after: previous_balance plus the signed amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Balance before this transaction.
    pub previous_balance: Decimal,
    /// Balance after this transaction.
    pub balance_after: Decimal,
}

impl RunningBalance {
    /// Running balance for the first transaction of a chain.
    #[must_use]
    pub fn first(change: Decimal) -> Self {
        Self::after(Decimal::ZERO, change)
    }

    /// Running balance for a transaction that follows `previous_balance`.
    #[must_use]
    pub fn after(previous_balance: Decimal, change: Decimal) -> Self {
        Self {
            previous_balance,
            balance_after: previous_balance + change,
        }
    }

    /// Running balance chained onto an optional tail.
    #[must_use]
    pub fn chained(tail: Option<Decimal>, change: Decimal) -> Self {
        tail.map_or_else(|| Self::first(change), |previous| Self::after(previous, change))
    }

    /// Returns the running balance that follows this one.
    #[must_use]
    pub fn next(&self, change: Decimal) -> Self {
        Self::after(self.balance_after, change)
    }
}

/// Totals over a project's active chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Sum of credit amounts.
    pub total_credit: Decimal,
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Number of active transactions.
    pub transaction_count: u64,
    /// balance_after of the latest active transaction (zero if none).
    pub current_balance: Decimal,
}

impl LedgerSummary {
    /// Summarises a chain given in chain order (date, then id).
    #[must_use]
    pub fn from_chain(chain: &[ChainEntry]) -> Self {
        let mut summary = Self {
            total_credit: Decimal::ZERO,
            total_debit: Decimal::ZERO,
            transaction_count: 0,
            current_balance: Decimal::ZERO,
        };

        for entry in chain {
            match entry.transaction_type {
                TransactionType::Credit => summary.total_credit += entry.amount,
                TransactionType::Debit => summary.total_debit += entry.amount,
            }
            summary.transaction_count += 1;
        }

        if let Some(last) = chain.last() {
            summary.current_balance = last.balance_after;
        }

        summary
    }

    /// Net movement implied by the totals.
    #[must_use]
    pub fn net_movement(&self) -> Decimal {
        self.total_credit - self.total_debit
    }
}
