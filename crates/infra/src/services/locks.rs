//! Lock Manager: per-account exclusive-write capability.
//!
//! State machine per account: `Unlocked → Locked(secret, user) → Unlocked`.
//! The only synchronization primitive is the store's conditional update; no
//! in-process lock is held across requests.

use rand::RngCore;
use tracing::{info, instrument, warn};

use bankers_accounts::{Account, Lock, LockSecret, LockState};
use bankers_core::{AccountId, UserId};

use crate::error::{Problem, ServiceError, ServiceResult};
use crate::store::accounts::{ClearLock, LockedWith, SetLock, Unlocked};
use crate::store::{ById, DocumentStore};
use crate::users::UserDirectory;

/// Smallest accepted secret size, in random bytes.
pub const MIN_SECRET_BYTES: usize = 16;

/// Result of an acquire attempt. Losing the race is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockAcquisition {
    /// The caller holds the lock. The secret is disclosed only here.
    Acquired { secret: LockSecret },
    NotAcquired,
}

impl LockAcquisition {
    pub fn got_lock(&self) -> bool {
        matches!(self, LockAcquisition::Acquired { .. })
    }
}

/// Random hex-encoded capability secret.
pub fn generate_secret(bytes: usize) -> LockSecret {
    let mut buf = vec![0u8; bytes.max(MIN_SECRET_BYTES)];
    rand::thread_rng().fill_bytes(&mut buf);
    LockSecret::new(hex::encode(buf))
}

pub struct LockManager<A, U> {
    accounts: A,
    users: U,
    secret_bytes: usize,
}

impl<A, U> LockManager<A, U>
where
    A: DocumentStore<Account>,
    U: UserDirectory,
{
    pub fn new(accounts: A, users: U, secret_bytes: usize) -> Self {
        Self {
            accounts,
            users,
            secret_bytes: secret_bytes.max(MIN_SECRET_BYTES),
        }
    }

    async fn load(&self, account_id: AccountId) -> ServiceResult<Account> {
        self.accounts
            .find_one(&ById(account_id))
            .await?
            .ok_or(ServiceError::NotFound)
    }

    #[instrument(skip(self), fields(account_id = %account_id, user_id = %user_id))]
    pub async fn acquire(
        &self,
        account_id: AccountId,
        user_id: UserId,
    ) -> ServiceResult<LockAcquisition> {
        self.load(account_id).await?;
        if !self.users.exists(user_id).await? {
            warn!("lock requested by unknown user");
            return Err(Problem::UserNotFound.into());
        }

        let secret = generate_secret(self.secret_bytes);
        let lock = SetLock(Lock::held_by(user_id, secret.clone()));
        match self.accounts.update_one(&Unlocked(account_id), &lock).await? {
            Some(_) => {
                info!("account lock acquired");
                Ok(LockAcquisition::Acquired { secret })
            }
            None => {
                warn!("account already locked");
                Ok(LockAcquisition::NotAcquired)
            }
        }
    }

    #[instrument(skip(self, secret), fields(account_id = %account_id))]
    pub async fn check(
        &self,
        account_id: AccountId,
        secret: &LockSecret,
    ) -> ServiceResult<LockState> {
        Ok(self.load(account_id).await?.lock_state(secret))
    }

    /// Precondition gate for mutating operations. Returns the account as read.
    ///
    /// Unknown accounts are reported as `BadRequest(AccountNotFound)`.
    #[instrument(skip(self, secret), fields(account_id = %account_id))]
    pub async fn require(
        &self,
        account_id: AccountId,
        secret: &LockSecret,
    ) -> ServiceResult<Account> {
        let account = self
            .accounts
            .find_one(&ById(account_id))
            .await?
            .ok_or(ServiceError::BadRequest(Problem::AccountNotFound))?;
        if let Some(problem) = Problem::from_lock_state(account.lock_state(secret)) {
            warn!(%problem, "lock gate rejected request");
            return Err(problem.into());
        }
        Ok(account)
    }

    /// Releases the lock if `secret` matches. A mismatch is `Ok(false)`.
    #[instrument(skip(self, secret), fields(account_id = %account_id))]
    pub async fn release(&self, account_id: AccountId, secret: &LockSecret) -> ServiceResult<bool> {
        let filter = LockedWith {
            account_id,
            secret: secret.clone(),
        };
        if self.accounts.update_one(&filter, &ClearLock).await?.is_some() {
            info!("account lock released");
            return Ok(true);
        }
        self.load(account_id).await?;
        warn!("lock release refused");
        Ok(false)
    }

    /// Unconditional release for administrative recovery.
    #[instrument(skip(self), fields(account_id = %account_id))]
    pub async fn force_release(&self, account_id: AccountId) -> ServiceResult<bool> {
        match self.accounts.update_one(&ById(account_id), &ClearLock).await? {
            Some(_) => {
                warn!("account lock force-released");
                Ok(true)
            }
            None => Err(ServiceError::NotFound),
        }
    }
}
