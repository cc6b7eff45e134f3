//! Domain types for recording and editing fund transactions.

use buildtrack_shared::types::{ProjectId, UserId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::TransactionType;

/// Input for recording a new fund transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordTransactionInput {
    /// Project whose fund the transaction belongs to.
    pub project_id: ProjectId,
    /// Value date of the transaction.
    pub date: NaiveDate,
    /// Who was paid, or who paid in.
    pub payee: String,
    /// Credit or debit.
    pub transaction_type: TransactionType,
    /// Positive amount.
    pub amount: Decimal,
    /// Free-text description.
    pub description: String,
    /// Payment voucher or receipt number.
    pub pv_or_receipt_no: String,
    /// Free-text remarks.
    #[serde(default)]
    pub remarks: String,
    /// User recording the transaction.
    pub created_by: Option<UserId>,
}

/// Partial update of a fund transaction. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTransactionInput {
    /// New value date.
    pub date: Option<NaiveDate>,
    /// New payee.
    pub payee: Option<String>,
    /// New direction.
    pub transaction_type: Option<TransactionType>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New description.
    pub description: Option<String>,
    /// New voucher/receipt number.
    pub pv_or_receipt_no: Option<String>,
    /// New remarks.
    pub remarks: Option<String>,
}

impl UpdateTransactionInput {
    /// Returns true if the update touches a field the balance depends on.
    #[must_use]
    pub fn affects_balance(&self) -> bool {
        self.date.is_some() || self.transaction_type.is_some() || self.amount.is_some()
    }
}

/// The balance-relevant fields of a transaction about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    /// Value date.
    pub date: NaiveDate,
    /// Payee.
    pub payee: String,
    /// Direction.
    pub transaction_type: TransactionType,
    /// Amount.
    pub amount: Decimal,
}

impl TransactionDraft {
    /// Draft for a new transaction.
    #[must_use]
    pub fn from_record(input: &RecordTransactionInput) -> Self {
        Self {
            date: input.date,
            payee: input.payee.clone(),
            transaction_type: input.transaction_type,
            amount: input.amount,
        }
    }

    /// Draft for an edited transaction: the stored fields overlaid with the update.
    #[must_use]
    pub fn merged(stored: &Self, update: &UpdateTransactionInput) -> Self {
        Self {
            date: update.date.unwrap_or(stored.date),
            payee: update.payee.clone().unwrap_or_else(|| stored.payee.clone()),
            transaction_type: update.transaction_type.unwrap_or(stored.transaction_type),
            amount: update.amount.unwrap_or(stored.amount),
        }
    }

    /// Signed effect on the running balance.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.transaction_type.signed_amount(self.amount)
    }
}

/// One active transaction as seen by the chain: enough to order it and chain onto it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    /// Insertion sequence, the tie-break within a date.
    pub id: i32,
    /// Value date.
    pub date: NaiveDate,
    /// Direction.
    pub transaction_type: TransactionType,
    /// Amount.
    pub amount: Decimal,
    /// Stored running balance.
    pub balance_after: Decimal,
}

impl ChainEntry {
    /// Chain order key: (date, id).
    #[must_use]
    pub fn order_key(&self) -> (NaiveDate, i32) {
        (self.date, self.id)
    }
}
