//! Ledger error types for validation and referential errors.

use buildtrack_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Amount cannot be zero.
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    /// Amount cannot be negative.
    #[error("Amount must be greater than zero, got {0}")]
    NegativeAmount(Decimal),

    /// Amount carries more decimal places than the ledger stores.
    #[error("Amount may have at most 2 decimal places, got {0}")]
    TooManyDecimals(Decimal),

    /// Amount does not fit the ledger's money column.
    #[error("Amount must be below 10000000000000, got {0}")]
    AmountTooLarge(Decimal),

    /// Transaction type is neither Credit nor Debit.
    #[error("Invalid transaction type: {0}")]
    InvalidTransactionType(String),

    /// Payee is required.
    #[error("Payee is required")]
    BlankPayee,

    // ========== Referential Errors ==========
    /// Project not found.
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    /// Project is inactive and cannot take new transactions.
    #[error("Project {0} is inactive")]
    ProjectInactive(Uuid),

    /// Transaction not found or soft-deleted.
    #[error("Fund transaction not found: {0}")]
    TransactionNotFound(i32),

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::TooManyDecimals(_) => "TOO_MANY_DECIMALS",
            Self::AmountTooLarge(_) => "AMOUNT_TOO_LARGE",
            Self::InvalidTransactionType(_) => "INVALID_TRANSACTION_TYPE",
            Self::BlankPayee => "BLANK_PAYEE",
            Self::ProjectNotFound(_) => "PROJECT_NOT_FOUND",
            Self::ProjectInactive(_) => "PROJECT_INACTIVE",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::ZeroAmount
            | Self::NegativeAmount(_)
            | Self::TooManyDecimals(_)
            | Self::AmountTooLarge(_)
            | Self::InvalidTransactionType(_)
            | Self::BlankPayee => 400,

            Self::ProjectNotFound(_) | Self::ProjectInactive(_) | Self::TransactionNotFound(_) => {
                404
            }

            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the input field a validation error refers to.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::ZeroAmount
            | Self::NegativeAmount(_)
            | Self::TooManyDecimals(_)
            | Self::AmountTooLarge(_) => Some("amount"),
            Self::InvalidTransactionType(_) => Some("transaction_type"),
            Self::BlankPayee => Some("payee"),
            _ => None,
        }
    }

    /// Returns true if the caller can fix the error by changing the input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.http_status_code() == 400
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::ZeroAmount
            | LedgerError::NegativeAmount(_)
            | LedgerError::TooManyDecimals(_)
            | LedgerError::AmountTooLarge(_)
            | LedgerError::InvalidTransactionType(_)
            | LedgerError::BlankPayee => Self::Validation {
                field: err.field().map(str::to_string),
                message,
            },
            LedgerError::ProjectNotFound(_)
            | LedgerError::ProjectInactive(_)
            | LedgerError::TransactionNotFound(_) => Self::NotFound(message),
            LedgerError::Database(e) => Self::Database(e),
            LedgerError::Internal(e) => Self::Internal(e),
        }
    }
}
