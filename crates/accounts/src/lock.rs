use serde::{Deserialize, Serialize};

use bankers_core::UserId;

/// Opaque capability proving exclusive write access to one account.
///
/// Never printed through `Debug` so it does not leak into logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockSecret(String);

impl LockSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Debug for LockSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("LockSecret(..)")
    }
}

/// Advisory lock embedded in an account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lock {
    pub is_locked: bool,
    pub locked_by: UserId,
    pub secret: LockSecret,
}

impl Lock {
    pub fn held_by(user: UserId, secret: LockSecret) -> Self {
        Self {
            is_locked: true,
            locked_by: user,
            secret,
        }
    }
}

/// Outcome of comparing a presented secret against an account's lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    NotLocked,
    LockedWithMatchingSecret,
    LockedWithOtherSecret,
}

impl LockState {
    pub fn evaluate(lock: Option<&Lock>, presented: &LockSecret) -> Self {
        match lock {
            Some(lock) if lock.is_locked => {
                if &lock.secret == presented {
                    LockState::LockedWithMatchingSecret
                } else {
                    LockState::LockedWithOtherSecret
                }
            }
            _ => LockState::NotLocked,
        }
    }

    pub fn is_locked(self) -> bool {
        !matches!(self, LockState::NotLocked)
    }

    pub fn secret_matches(self) -> bool {
        matches!(self, LockState::LockedWithMatchingSecret)
    }
}
