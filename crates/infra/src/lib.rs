//! Infrastructure layer: document storage, lock management, the balance
//! ledger and the transaction lifecycle.

pub mod error;
pub mod services;
pub mod store;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{FailureCause, Problem, ServiceError, ServiceResult};
pub use services::{
    AccountService, BalanceLedger, LockAcquisition, LockManager, NewAccount, TransactionService,
};
pub use store::{DocumentStore, InMemoryDocumentStore, StoreError};
pub use users::{StoredUserDirectory, User, UserDirectory};
