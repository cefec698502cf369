use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bankers_core::{AccountId, DomainError, DomainResult, Entity};
use bankers_money::{Amount, Currency};

use crate::balance::{Balance, BalanceKind, Balances};
use crate::lock::{Lock, LockSecret, LockState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Enabled,
    Disabled,
    Deleted,
}

/// ISO 20022 `ExternalCashAccountType1Code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CashAccountType {
    Othr,
    Svgs,
    Loan,
    Moma,
    Cash,
    /// Charge card account; carries an authorised credit limit.
    Char,
    Cacc,
    #[default]
    Tran,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Usage {
    /// Private personal account.
    Priv,
    /// Professional / organisation account.
    Orga,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingNumbers {
    pub ach: Option<String>,
    pub wire: Option<String>,
}

/// Externally visible reference to an account (own or counterparty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountReference {
    /// Primary account number.
    pub pan: String,
    pub msisdn: Option<String>,
    pub currency: Currency,
    pub routing_numbers: RoutingNumbers,
}

/// Account record. Balances and lock are embedded and never addressed on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub resource_id: AccountId,
    pub name: String,
    pub product: String,
    pub cash_account_type: CashAccountType,
    pub status: AccountStatus,
    pub usage: Usage,
    pub reference: AccountReference,
    pub balances: Balances,
    pub lock: Option<Lock>,
    pub authorized_limit: Option<Amount>,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: DateTime<Utc>,
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.resource_id
    }
}

/// Everything needed to open a new account.
///
/// Generated identifiers (PAN, routing numbers) are supplied by the caller so
/// that opening stays deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAccount {
    pub resource_id: AccountId,
    pub name: String,
    pub product: String,
    pub cash_account_type: CashAccountType,
    pub status: AccountStatus,
    pub usage: Usage,
    pub pan: String,
    pub msisdn: Option<String>,
    pub routing_numbers: RoutingNumbers,
    pub initial_balance: Amount,
    pub authorized_limit: Option<Amount>,
}

impl Account {
    pub fn open(cmd: OpenAccount, now: DateTime<Utc>) -> DomainResult<Self> {
        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("account name must not be empty"));
        }
        if cmd.product.trim().is_empty() {
            return Err(DomainError::validation("account product must not be empty"));
        }

        let currency = cmd.initial_balance.currency();
        let mut balances = Balances::new();
        balances.upsert(Balance::new(BalanceKind::ClosingBooked, cmd.initial_balance, now));

        if let Some(limit) = cmd.authorized_limit {
            let authorised = cmd.initial_balance.checked_add(&limit).map_err(|e| {
                DomainError::validation(format!("authorized limit does not fit account: {e}"))
            })?;
            balances.upsert(Balance::new(BalanceKind::Authorised, authorised, now));
        }

        Ok(Self {
            resource_id: cmd.resource_id,
            name: cmd.name,
            product: cmd.product,
            cash_account_type: cmd.cash_account_type,
            status: cmd.status,
            usage: cmd.usage,
            reference: AccountReference {
                pan: cmd.pan,
                msisdn: cmd.msisdn,
                currency,
                routing_numbers: cmd.routing_numbers,
            },
            balances,
            lock: None,
            authorized_limit: cmd.authorized_limit,
            created_at: now,
            last_modified_at: now,
        })
    }

    pub fn currency(&self) -> Currency {
        self.reference.currency
    }

    pub fn is_enabled(&self) -> bool {
        self.status == AccountStatus::Enabled
    }

    pub fn lock_state(&self, presented: &LockSecret) -> LockState {
        LockState::evaluate(self.lock.as_ref(), presented)
    }

    pub fn is_locked(&self) -> bool {
        self.lock.as_ref().is_some_and(|l| l.is_locked)
    }

    pub fn balance(&self, kind: BalanceKind) -> Option<&Balance> {
        self.balances.get(kind)
    }
}

/// Editable account metadata. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountChanges {
    pub name: Option<String>,
    pub msisdn: Option<String>,
    pub status: Option<AccountStatus>,
}

impl AccountChanges {
    /// Blank strings count as "not provided".
    pub fn is_empty(&self) -> bool {
        self.name.as_deref().is_none_or(|s| s.trim().is_empty())
            && self.msisdn.as_deref().is_none_or(|s| s.trim().is_empty())
            && self.status.is_none()
    }

    pub fn apply_to(&self, account: &mut Account, now: DateTime<Utc>) {
        if let Some(name) = self.name.as_deref().filter(|s| !s.trim().is_empty()) {
            account.name = name.to_string();
        }
        if let Some(msisdn) = self.msisdn.as_deref().filter(|s| !s.trim().is_empty()) {
            account.reference.msisdn = Some(msisdn.to_string());
        }
        if let Some(status) = self.status {
            account.status = status;
        }
        account.last_modified_at = now;
    }
}
