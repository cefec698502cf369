//! Transaction lifecycle: `(none) → Pending → Booked`.
//!
//! Creation inserts the pending row and then applies it to the ledger;
//! booking flips the row and then applies it to the ledger. When the ledger
//! step fails, the row change is compensated (delete, or revert to pending)
//! before the original failure is returned. The lock gate itself is the
//! caller's precondition; the ledger write re-checks the secret.

use chrono::Utc;
use tracing::{error, info, instrument, warn};

use bankers_accounts::{Account, LockSecret};
use bankers_core::{AccountId, TransactionId};
use bankers_transactions::{
    AccountTransactions, NewTransaction, Transaction, TransactionFilter, TransactionLists,
};

use crate::error::{Problem, ServiceError, ServiceResult};
use crate::services::ledger::BalanceLedger;
use crate::store::transactions::{
    AccountSearch, BookedInAccount, InAccount, MarkBooked, PendingInAccount, RevertBooking,
};
use crate::store::{ById, DocumentStore};

pub struct TransactionService<T, A> {
    transactions: T,
    accounts: A,
    ledger: BalanceLedger<A>,
}

impl<T, A> TransactionService<T, A>
where
    T: DocumentStore<Transaction>,
    A: DocumentStore<Account> + Clone,
{
    pub fn new(transactions: T, accounts: A) -> Self {
        Self {
            transactions,
            ledger: BalanceLedger::new(accounts.clone()),
            accounts,
        }
    }

    /// Records a new pending debit or credit, depending on `new.direction`.
    #[instrument(skip(self, secret, new), fields(account_id = %account_id), err)]
    pub async fn create(
        &self,
        account_id: AccountId,
        secret: &LockSecret,
        new: NewTransaction,
    ) -> ServiceResult<Transaction> {
        let account = self
            .accounts
            .find_one(&ById(account_id))
            .await?
            .ok_or(ServiceError::BadRequest(Problem::AccountNotFound))?;
        if !account.is_enabled() {
            warn!(status = ?account.status, "transaction on disabled account rejected");
            return Err(Problem::AccountNotEnabled.into());
        }
        if new.amount.currency() != account.currency() {
            warn!(
                account_currency = %account.currency(),
                amount_currency = %new.amount.currency(),
                "transaction currency mismatch"
            );
            return Err(Problem::WrongCurrencyType.into());
        }

        let tx = Transaction::pending(TransactionId::new(), account_id, new, Utc::now())?;
        self.transactions.insert_one(tx.clone()).await?;

        if let Err(err) = self.ledger.apply_new(account_id, secret, &tx).await {
            error!(transaction_id = %tx.transaction_id, error = %err, "ledger update failed, deleting pending transaction");
            match self.transactions.delete_one(&ById(tx.transaction_id)).await {
                Ok(true) => {}
                Ok(false) => {
                    error!(transaction_id = %tx.transaction_id, "rollback found no transaction to delete")
                }
                Err(rollback) => {
                    error!(transaction_id = %tx.transaction_id, error = %rollback, "rollback of pending transaction failed")
                }
            }
            return Err(err);
        }

        info!(transaction_id = %tx.transaction_id, side = ?tx.side(), "transaction created");
        Ok(tx)
    }

    #[instrument(skip(self, secret), fields(account_id = %account_id, transaction_id = %transaction_id), err)]
    pub async fn book(
        &self,
        account_id: AccountId,
        secret: &LockSecret,
        transaction_id: TransactionId,
    ) -> ServiceResult<Transaction> {
        let key = InAccount {
            account_id,
            transaction_id,
        };
        let booked = self
            .transactions
            .update_one(&PendingInAccount(key), &MarkBooked { at: Utc::now() })
            .await?
            .ok_or(ServiceError::BadRequest(Problem::NoMatchingPendingTransaction))?;

        if let Err(err) = self.ledger.apply_booked(account_id, secret, &booked).await {
            error!(error = %err, "ledger update failed, reverting booking");
            match self
                .transactions
                .update_one(&BookedInAccount(key), &RevertBooking)
                .await
            {
                Ok(Some(_)) => {}
                Ok(None) => error!("booking revert found no booked transaction"),
                Err(rollback) => error!(error = %rollback, "booking revert failed"),
            }
            return Err(err);
        }

        info!("transaction booked");
        Ok(booked)
    }

    #[instrument(skip(self), fields(account_id = %account_id, transaction_id = %transaction_id))]
    pub async fn get_one(
        &self,
        account_id: AccountId,
        transaction_id: TransactionId,
    ) -> ServiceResult<Transaction> {
        let key = InAccount {
            account_id,
            transaction_id,
        };
        self.transactions
            .find_one(&key)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    #[instrument(skip(self, filter), fields(account_id = %account_id))]
    pub async fn search(
        &self,
        account_id: AccountId,
        filter: TransactionFilter,
    ) -> ServiceResult<AccountTransactions> {
        let account = self
            .accounts
            .find_one(&ById(account_id))
            .await?
            .ok_or(ServiceError::BadRequest(Problem::AccountNotFound))?;

        let status = filter.booking_status;
        let mut found = self
            .transactions
            .find_many(&AccountSearch { account_id, filter })
            .await?;
        found.sort_by_key(|tx| tx.entry_date);

        Ok(AccountTransactions {
            account: account.reference,
            transactions: TransactionLists::partition(found, status),
        })
    }
}
