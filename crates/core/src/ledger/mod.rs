//! Project fund ledger.
//!
//! This module implements the running-balance ledger:
//! - Credit/debit transaction types and signed amounts
//! - Running balance chaining against the previous active transaction
//! - Input validation for recording and editing transactions
//! - Ledger summaries and explicit rebalancing of a stored chain
//! - Error types for ledger operations

pub mod balance;
pub mod entry;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use balance::{LedgerSummary, RunningBalance};
pub use entry::TransactionType;
pub use error::LedgerError;
pub use service::{BalanceCorrection, LedgerService};
pub use types::{ChainEntry, RecordTransactionInput, TransactionDraft, UpdateTransactionInput};
