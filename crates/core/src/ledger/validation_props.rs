//! Property-based tests for fund transaction validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::validation::{validate_amount, validate_payee};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate zero or negative amounts.
fn non_positive_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..=0i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every strictly positive amount is accepted.
    #[test]
    fn prop_positive_amount_accepted(amount in positive_amount()) {
        prop_assert!(validate_amount(amount).is_ok());
    }

    /// Every zero or negative amount is rejected with an amount error.
    #[test]
    fn prop_non_positive_amount_rejected(amount in non_positive_amount()) {
        let result = validate_amount(amount);
        prop_assert!(
            matches!(result, Err(LedgerError::ZeroAmount | LedgerError::NegativeAmount(_))),
            "amount {} should be rejected",
            amount
        );
    }

    /// Positive amounts with a non-zero third decimal place are rejected.
    #[test]
    fn prop_sub_cent_amount_rejected(mills in 1i64..10_000_000i64) {
        prop_assume!(mills % 10 != 0);
        let amount = Decimal::new(mills, 3);
        prop_assert!(matches!(validate_amount(amount), Err(LedgerError::TooManyDecimals(_))));
    }

    /// Payees with at least one visible character are accepted.
    #[test]
    fn prop_non_blank_payee_accepted(payee in "[ ]{0,3}[a-zA-Z0-9][a-zA-Z0-9 ]{0,30}") {
        prop_assert!(validate_payee(&payee).is_ok());
    }

    /// Whitespace-only payees are rejected.
    #[test]
    fn prop_blank_payee_rejected(payee in "[ \t]{0,10}") {
        prop_assert!(matches!(validate_payee(&payee), Err(LedgerError::BlankPayee)));
    }
}
