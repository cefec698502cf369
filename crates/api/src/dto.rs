use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bankers_accounts::{AccountReference, LockState};
use bankers_core::{AccountId, TransactionId, UserId};
use bankers_infra::LockAcquisition;
use bankers_money::Amount;
use bankers_transactions::{Direction, NewTransaction};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDebitRequest {
    pub lock_secret: String,
    pub check_id: Option<String>,
    pub amount: Amount,
    pub debtor_name: String,
    pub debtor_account: AccountReference,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCreditRequest {
    pub lock_secret: String,
    pub check_id: Option<String>,
    pub amount: Amount,
    pub creditor_name: String,
    pub creditor_account: AccountReference,
    pub value_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTransactionRequest {
    pub lock_secret: String,
    pub transaction_id: TransactionId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<NewDebitRequest> for NewTransaction {
    fn from(req: NewDebitRequest) -> Self {
        NewTransaction {
            check_id: req.check_id,
            amount: req.amount,
            direction: Direction::Debit {
                debtor_name: req.debtor_name,
                debtor_account: req.debtor_account,
            },
        }
    }
}

impl From<NewCreditRequest> for NewTransaction {
    fn from(req: NewCreditRequest) -> Self {
        NewTransaction {
            check_id: req.check_id,
            amount: req.amount,
            direction: Direction::Credit {
                creditor_name: req.creditor_name,
                creditor_account: req.creditor_account,
                value_date: req.value_date,
            },
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockAccountResponse {
    pub resource_id: AccountId,
    pub user_id: UserId,
    pub got_lock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl LockAccountResponse {
    pub fn new(resource_id: AccountId, user_id: UserId, outcome: LockAcquisition) -> Self {
        let secret = match outcome {
            LockAcquisition::Acquired { secret } => Some(secret.into_inner()),
            LockAcquisition::NotAcquired => None,
        };
        Self {
            resource_id,
            user_id,
            got_lock: secret.is_some(),
            secret,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockStatusResponse {
    pub locked: bool,
    pub secret_matches: bool,
}

impl From<LockState> for LockStatusResponse {
    fn from(state: LockState) -> Self {
        Self {
            locked: state.is_locked(),
            secret_matches: state.secret_matches(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReleaseResponse {
    pub released: bool,
}
