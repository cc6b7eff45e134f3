//! Business rule validation for fund transactions.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::TransactionDraft;

/// Decimal places a stored amount keeps.
pub const AMOUNT_SCALE: u32 = 2;

/// Exclusive upper bound on amounts: 13 integer digits, matching `DECIMAL(15,2)`.
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(1_316_134_912, 2_328, 0, false, 0);

/// Validates that an amount is strictly positive and fits the money column.
///
/// Trailing zeros do not count towards the scale, so `10.500` is accepted.
///
/// # Errors
///
/// Returns `ZeroAmount`, `NegativeAmount`, `TooManyDecimals` or
/// `AmountTooLarge`.
pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }
    if amount.is_sign_negative() {
        return Err(LedgerError::NegativeAmount(amount));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(LedgerError::TooManyDecimals(amount));
    }
    if amount >= AMOUNT_LIMIT {
        return Err(LedgerError::AmountTooLarge(amount));
    }
    Ok(())
}

/// Validates that a payee has visible content.
///
/// # Errors
///
/// Returns `BlankPayee` for empty or whitespace-only input.
pub fn validate_payee(payee: &str) -> Result<(), LedgerError> {
    if payee.trim().is_empty() {
        return Err(LedgerError::BlankPayee);
    }
    Ok(())
}

/// Validates every balance-relevant field of a draft.
///
/// # Errors
///
/// Returns the first failing rule: amount, then payee.
pub fn validate_draft(draft: &TransactionDraft) -> Result<(), LedgerError> {
    validate_amount(draft.amount)?;
    validate_payee(&draft.payee)
}
