use thiserror::Error;

use crate::Currency;

pub type MoneyResult<T> = Result<T, MoneyError>;

/// Failures of amount arithmetic.
///
/// `CurrencyMismatch` is a programming error on the caller's side: amounts of
/// different currency variants are never coerced into each other.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoneyError {
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },

    #[error("amount overflow in {0}")]
    Overflow(Currency),
}
