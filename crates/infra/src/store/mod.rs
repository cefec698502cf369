//! Document storage boundary.
//!
//! Defines the storage contract the services rely on (find, insert, delete and
//! an atomic conditional update) plus the account and transaction predicates
//! and mutations expressed against it.

pub mod accounts;
pub mod in_memory;
pub mod transactions;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use r#trait::{All, ById, DocumentStore, Filter, StoreError, StoreResult, Update};
