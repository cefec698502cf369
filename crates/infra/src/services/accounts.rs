//! Account service: opening, lookup, search and lock-gated metadata updates.

use chrono::Utc;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use bankers_accounts::{
    Account, AccountChanges, AccountStatus, CashAccountType, LockSecret, OpenAccount,
    RoutingNumbers, Usage,
};
use bankers_core::{AccountId, DomainError};
use bankers_money::Amount;

use crate::error::{Problem, ServiceError, ServiceResult};
use crate::store::accounts::{AccountFilter, ApplyChanges, LockedWith};
use crate::store::{ById, DocumentStore};

/// Wire routing numbers handed out to new accounts.
pub const WIRE_ROUTING_NUMBERS: [&str; 5] =
    ["963876207", "640479489", "310264758", "613844969", "265902275"];

/// Request to open an account. The initial balance fixes the account currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    pub product: String,
    #[serde(default)]
    pub cash_account_type: CashAccountType,
    pub usage: Usage,
    #[serde(default)]
    pub msisdn: Option<String>,
    #[serde(default)]
    pub status: Option<AccountStatus>,
    pub initial_balance: Amount,
    #[serde(default)]
    pub authorized_limit: Option<Amount>,
}

fn generate_reference() -> (String, RoutingNumbers) {
    let mut rng = rand::thread_rng();
    let pan = format!("{:08}", rng.gen_range(0..100_000_000u32));
    let ach = format!("{:07}", rng.gen_range(0..10_000_000u32));
    let wire = WIRE_ROUTING_NUMBERS.choose(&mut rng).map(|w| w.to_string());
    (
        pan,
        RoutingNumbers {
            ach: Some(ach),
            wire,
        },
    )
}

pub struct AccountService<A> {
    accounts: A,
    /// Limit for `CHAR` accounts opened without one, in smallest units.
    char_overdraft: i128,
}

impl<A> AccountService<A>
where
    A: DocumentStore<Account>,
{
    pub fn new(accounts: A, char_overdraft: i128) -> Self {
        Self {
            accounts,
            char_overdraft,
        }
    }

    fn limit_for(&self, new: &NewAccount) -> ServiceResult<Option<Amount>> {
        match (new.authorized_limit, new.cash_account_type) {
            (Some(limit), _) => Ok(Some(limit)),
            (None, CashAccountType::Char) => {
                Amount::from_smallest_units(new.initial_balance.currency(), self.char_overdraft)
                    .map(Some)
                    .map_err(|e| ServiceError::failed(DomainError::invariant(e.to_string())))
            }
            (None, _) => Ok(None),
        }
    }

    #[instrument(skip(self, new), fields(product = %new.product), err)]
    pub async fn create(&self, new: NewAccount) -> ServiceResult<Account> {
        let authorized_limit = self.limit_for(&new)?;
        let (pan, routing_numbers) = generate_reference();

        let account = Account::open(
            OpenAccount {
                resource_id: AccountId::new(),
                name: new.name,
                product: new.product,
                cash_account_type: new.cash_account_type,
                status: new.status.unwrap_or(AccountStatus::Enabled),
                usage: new.usage,
                pan,
                msisdn: new.msisdn,
                routing_numbers,
                initial_balance: new.initial_balance,
                authorized_limit,
            },
            Utc::now(),
        )?;
        self.accounts.insert_one(account.clone()).await?;

        info!(account_id = %account.resource_id, currency = %account.currency(), "account created");
        Ok(account)
    }

    pub async fn get(&self, account_id: AccountId) -> ServiceResult<Account> {
        self.accounts
            .find_one(&ById(account_id))
            .await?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn search(&self, filter: AccountFilter) -> ServiceResult<Vec<Account>> {
        Ok(self.accounts.find_many(&filter).await?)
    }

    /// Lock-gated metadata update. An empty change set returns the account as is.
    #[instrument(skip(self, secret, changes), fields(account_id = %account_id), err)]
    pub async fn update(
        &self,
        account_id: AccountId,
        secret: &LockSecret,
        changes: AccountChanges,
    ) -> ServiceResult<Account> {
        let account = self.get(account_id).await?;
        if let Some(problem) = Problem::from_lock_state(account.lock_state(secret)) {
            warn!(%problem, "account update rejected");
            return Err(problem.into());
        }
        if changes.is_empty() {
            return Ok(account);
        }

        let filter = LockedWith {
            account_id,
            secret: secret.clone(),
        };
        let update = ApplyChanges {
            changes,
            at: Utc::now(),
        };
        if let Some(updated) = self.accounts.update_one(&filter, &update).await? {
            info!("account updated");
            return Ok(updated);
        }

        // The lock changed hands between the gate and the write.
        let current = self.get(account_id).await?;
        let problem = Problem::from_lock_state(current.lock_state(secret))
            .unwrap_or(Problem::AccountLockedByAnotherUser);
        warn!(%problem, "account update lost its lock");
        Err(problem.into())
    }
}
