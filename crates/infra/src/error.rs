//! Service outcome model.
//!
//! Every service operation returns `ServiceResult<T>`. Expected business
//! outcomes are `NotFound` and `BadRequest`; anything unexpected is `Failed`
//! and carries the underlying cause for server-side logging.

use thiserror::Error;

use bankers_accounts::{LedgerError, LockState};
use bankers_core::DomainError;

use crate::store::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Business-rule violations with stable, user-facing messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Problem {
    #[error("Account must be locked to update")]
    AccountNotLocked,

    #[error("Account is locked by another user")]
    AccountLockedByAnotherUser,

    #[error("Given account id does not exist.")]
    AccountNotFound,

    #[error(
        "Account is not enabled, and the requested action is only allowed on enabled accounts."
    )]
    AccountNotEnabled,

    #[error("Attempted to use the wrong Currency type")]
    WrongCurrencyType,

    #[error("Given user id does not exist.")]
    UserNotFound,

    #[error("Failed to find matching transaction to book.")]
    NoMatchingPendingTransaction,

    /// Request content rejected by domain validation.
    #[error("Invalid request: {0}")]
    InvalidInput(String),
}

impl Problem {
    /// Lock gate for mutating operations: only an exact secret match passes.
    pub fn from_lock_state(state: LockState) -> Option<Problem> {
        match state {
            LockState::NotLocked => Some(Problem::AccountNotLocked),
            LockState::LockedWithOtherSecret => Some(Problem::AccountLockedByAnotherUser),
            LockState::LockedWithMatchingSecret => None,
        }
    }
}

/// Underlying cause of an unexpected failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FailureCause {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("ledger update failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A conditional write matched nothing although its precondition held
    /// when the operation started.
    #[error("concurrent modification: {0}")]
    Conflict(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    BadRequest(Problem),

    #[error("operation failed: {0}")]
    Failed(FailureCause),
}

impl ServiceError {
    pub fn failed(cause: impl Into<FailureCause>) -> Self {
        Self::Failed(cause.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Failed(FailureCause::Conflict(msg.into()))
    }
}

impl From<Problem> for ServiceError {
    fn from(value: Problem) -> Self {
        ServiceError::BadRequest(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        ServiceError::Failed(FailureCause::Store(value))
    }
}

impl From<LedgerError> for ServiceError {
    fn from(value: LedgerError) -> Self {
        ServiceError::Failed(FailureCause::Ledger(value))
    }
}

/// Domain validation failures are the caller's fault; everything else the
/// domain reports is unexpected at this layer.
impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
                ServiceError::BadRequest(Problem::InvalidInput(msg))
            }
            DomainError::NotFound => ServiceError::NotFound,
            other => ServiceError::Failed(FailureCause::Domain(other)),
        }
    }
}
