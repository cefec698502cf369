//! Identifiers, the entity/value-object split and the domain error type
//! shared by every `bankers-*` crate.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AccountId, TransactionId, UserId};
pub use value_object::ValueObject;
