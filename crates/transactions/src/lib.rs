//! Transactions module: debit/credit records and their pending → booked lifecycle.
//!
//! Pure domain logic only: no IO, no persistence concerns.

pub mod search;
pub mod transaction;

pub use search::{AccountTransactions, TransactionFilter, TransactionLists};
pub use transaction::{BookingStatus, Direction, NewTransaction, Transaction};
