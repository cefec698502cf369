//! Money module: currency variants and exact amount arithmetic.
//!
//! Pure domain logic only: no IO.

pub mod amount;
pub mod currency;
pub mod error;

pub use amount::Amount;
pub use currency::Currency;
pub use error::{MoneyError, MoneyResult};
