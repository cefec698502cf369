use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Failure raised by pure domain code.
///
/// Nothing here touches storage; store and lock failures are mapped by the
/// service layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Caller-supplied data is unusable (blank names, mismatched amounts).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Internal state that must never happen did (e.g. a missing
    /// `closingBooked` balance).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
