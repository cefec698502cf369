//! Application services over the document store.

pub mod accounts;
pub mod ledger;
pub mod locks;
pub mod transactions;

pub use accounts::{AccountService, NewAccount, WIRE_ROUTING_NUMBERS};
pub use ledger::BalanceLedger;
pub use locks::{LockAcquisition, LockManager, MIN_SECRET_BYTES, generate_secret};
pub use transactions::TransactionService;
