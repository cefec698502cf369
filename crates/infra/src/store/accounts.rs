//! Account predicates and mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bankers_accounts::{
    Account, AccountChanges, AccountStatus, Balances, CashAccountType, Lock, LockSecret, Usage,
};
use bankers_core::AccountId;

use super::r#trait::{Filter, Update};

/// The account exists and nobody holds its lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unlocked(pub AccountId);

impl Filter<Account> for Unlocked {
    fn matches(&self, account: &Account) -> bool {
        account.resource_id == self.0 && !account.is_locked()
    }
}

/// The account is locked and its secret equals `secret`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedWith {
    pub account_id: AccountId,
    pub secret: LockSecret,
}

impl Filter<Account> for LockedWith {
    fn matches(&self, account: &Account) -> bool {
        account.resource_id == self.account_id && account.lock_state(&self.secret).secret_matches()
    }
}

/// Guard for ledger writes: the lock is still held with `secret` and the
/// balances are exactly the ones the new values were computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerUnchanged {
    pub account_id: AccountId,
    pub secret: LockSecret,
    pub balances: Balances,
}

impl Filter<Account> for LedgerUnchanged {
    fn matches(&self, account: &Account) -> bool {
        account.resource_id == self.account_id
            && account.lock_state(&self.secret).secret_matches()
            && account.balances == self.balances
    }
}

/// Account search criteria. Absent fields do not constrain the result.
///
/// `last_modified_before` and `last_modified_after` are both exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFilter {
    pub status: Option<AccountStatus>,
    pub cash_account_type: Option<CashAccountType>,
    pub usage: Option<Usage>,
    pub last_modified_before: Option<DateTime<Utc>>,
    pub last_modified_after: Option<DateTime<Utc>>,
}

impl Filter<Account> for AccountFilter {
    fn matches(&self, account: &Account) -> bool {
        self.status.is_none_or(|s| s == account.status)
            && self.cash_account_type.is_none_or(|t| t == account.cash_account_type)
            && self.usage.is_none_or(|u| u == account.usage)
            && self.last_modified_before.is_none_or(|at| account.last_modified_at < at)
            && self.last_modified_after.is_none_or(|at| account.last_modified_at > at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetLock(pub Lock);

impl Update<Account> for SetLock {
    fn apply(&self, account: &mut Account) {
        account.lock = Some(self.0.clone());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearLock;

impl Update<Account> for ClearLock {
    fn apply(&self, account: &mut Account) {
        account.lock = None;
    }
}

/// Writes back balances computed by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceBalances {
    pub balances: Balances,
    pub at: DateTime<Utc>,
}

impl Update<Account> for ReplaceBalances {
    fn apply(&self, account: &mut Account) {
        account.balances = self.balances.clone();
        account.last_modified_at = self.at;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyChanges {
    pub changes: AccountChanges,
    pub at: DateTime<Utc>,
}

impl Update<Account> for ApplyChanges {
    fn apply(&self, account: &mut Account) {
        self.changes.apply_to(account, self.at);
    }
}
