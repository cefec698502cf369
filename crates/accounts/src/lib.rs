//! Bank account module: account records, embedded balances, advisory locks
//! and the pure balance projections that transactions drive.
//!
//! Pure domain logic only: no IO, no persistence concerns.

pub mod account;
pub mod balance;
pub mod ledger;
pub mod lock;

pub use account::{
    Account, AccountChanges, AccountReference, AccountStatus, CashAccountType, OpenAccount,
    RoutingNumbers, Usage,
};
pub use balance::{Balance, BalanceKind, Balances};
pub use ledger::{EntrySide, LedgerEntry, LedgerError};
pub use lock::{Lock, LockSecret, LockState};
