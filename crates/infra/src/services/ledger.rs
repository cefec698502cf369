//! Balance Ledger: load → compute → persist for one account and one
//! transaction event.
//!
//! Each apply operation must run exactly once per transaction event. The
//! persist step is a conditional update that re-checks the lock secret and
//! that the balances are still the ones the new values were computed from,
//! so a concurrent writer makes the apply fail instead of being overwritten.

use chrono::Utc;
use tracing::{debug, instrument};

use bankers_accounts::{Account, EntrySide, LockSecret};
use bankers_core::{AccountId, DomainError};
use bankers_transactions::Transaction;

use crate::error::{ServiceError, ServiceResult};
use crate::store::accounts::{LedgerUnchanged, ReplaceBalances};
use crate::store::{ById, DocumentStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Pending,
    Booked,
}

pub struct BalanceLedger<A> {
    accounts: A,
}

impl<A> BalanceLedger<A>
where
    A: DocumentStore<Account>,
{
    pub fn new(accounts: A) -> Self {
        Self { accounts }
    }

    pub async fn apply_new_debit(
        &self,
        account_id: AccountId,
        secret: &LockSecret,
        tx: &Transaction,
    ) -> ServiceResult<Account> {
        self.apply(account_id, secret, tx, EntrySide::Debit, Phase::Pending)
            .await
    }

    pub async fn apply_new_credit(
        &self,
        account_id: AccountId,
        secret: &LockSecret,
        tx: &Transaction,
    ) -> ServiceResult<Account> {
        self.apply(account_id, secret, tx, EntrySide::Credit, Phase::Pending)
            .await
    }

    pub async fn apply_booked_debit(
        &self,
        account_id: AccountId,
        secret: &LockSecret,
        tx: &Transaction,
    ) -> ServiceResult<Account> {
        self.apply(account_id, secret, tx, EntrySide::Debit, Phase::Booked)
            .await
    }

    pub async fn apply_booked_credit(
        &self,
        account_id: AccountId,
        secret: &LockSecret,
        tx: &Transaction,
    ) -> ServiceResult<Account> {
        self.apply(account_id, secret, tx, EntrySide::Credit, Phase::Booked)
            .await
    }

    /// Dispatch on the transaction's recorded direction.
    pub async fn apply_new(
        &self,
        account_id: AccountId,
        secret: &LockSecret,
        tx: &Transaction,
    ) -> ServiceResult<Account> {
        match tx.side() {
            EntrySide::Debit => self.apply_new_debit(account_id, secret, tx).await,
            EntrySide::Credit => self.apply_new_credit(account_id, secret, tx).await,
        }
    }

    pub async fn apply_booked(
        &self,
        account_id: AccountId,
        secret: &LockSecret,
        tx: &Transaction,
    ) -> ServiceResult<Account> {
        match tx.side() {
            EntrySide::Debit => self.apply_booked_debit(account_id, secret, tx).await,
            EntrySide::Credit => self.apply_booked_credit(account_id, secret, tx).await,
        }
    }

    #[instrument(
        skip(self, secret, tx),
        fields(account_id = %account_id, transaction_id = %tx.transaction_id),
        err
    )]
    async fn apply(
        &self,
        account_id: AccountId,
        secret: &LockSecret,
        tx: &Transaction,
        side: EntrySide,
        phase: Phase,
    ) -> ServiceResult<Account> {
        if tx.side() != side {
            return Err(ServiceError::failed(DomainError::invariant(format!(
                "{:?} transaction routed to the {side:?} ledger path",
                tx.side()
            ))));
        }

        let mut account = self
            .accounts
            .find_one(&ById(account_id))
            .await?
            .ok_or_else(|| ServiceError::conflict("account disappeared before ledger update"))?;
        let before = account.balances.clone();

        let entry = tx.ledger_entry(Utc::now());
        match phase {
            Phase::Pending => account.apply_pending(&entry)?,
            Phase::Booked => account.apply_booked(&entry)?,
        }

        let guard = LedgerUnchanged {
            account_id,
            secret: secret.clone(),
            balances: before,
        };
        let write = ReplaceBalances {
            balances: account.balances.clone(),
            at: entry.at,
        };
        let persisted = self
            .accounts
            .update_one(&guard, &write)
            .await?
            .ok_or_else(|| {
                ServiceError::conflict("account lock or balances changed during ledger update")
            })?;

        debug!(?phase, balances = persisted.balances.len(), "ledger applied");
        Ok(persisted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureCause;
    use crate::testing::{Fixture, open_account, pending_credit, pending_debit};
    use bankers_accounts::{BalanceKind, LedgerError};
    use bankers_money::{Amount, MoneyError};

    fn amount(account: &Account, kind: BalanceKind) -> Option<Amount> {
        account.balance(kind).map(|b| b.amount)
    }

    #[tokio::test]
    async fn debit_then_book_settles_expected() {
        let fx = Fixture::new().await;
        let (account_id, secret) = fx.locked_account(open_account(Amount::galactic(100), None)).await;
        let mut tx = pending_debit(account_id, 30);

        let after = fx.ledger.apply_new_debit(account_id, &secret, &tx).await.unwrap();
        assert_eq!(amount(&after, BalanceKind::Expected), Some(Amount::galactic(70)));
        assert_eq!(amount(&after, BalanceKind::ClosingBooked), Some(Amount::galactic(100)));

        assert!(tx.book(Utc::now()));
        let after = fx.ledger.apply_booked(account_id, &secret, &tx).await.unwrap();
        assert_eq!(amount(&after, BalanceKind::ClosingBooked), Some(Amount::galactic(70)));
        assert_eq!(amount(&after, BalanceKind::Expected), None);
    }

    #[tokio::test]
    async fn authorised_follows_expected_plus_limit() {
        let fx = Fixture::new().await;
        let (account_id, secret) = fx
            .locked_account(open_account(Amount::galactic(100), Some(Amount::galactic(50))))
            .await;

        let after = fx
            .ledger
            .apply_new_debit(account_id, &secret, &pending_debit(account_id, 120))
            .await
            .unwrap();
        assert_eq!(amount(&after, BalanceKind::Expected), Some(Amount::galactic(-20)));
        assert_eq!(amount(&after, BalanceKind::Authorised), Some(Amount::galactic(30)));
    }

    #[tokio::test]
    async fn wrong_path_is_rejected_before_loading() {
        let fx = Fixture::new().await;
        let (account_id, secret) = fx.locked_account(open_account(Amount::galactic(1), None)).await;
        let err = fx
            .ledger
            .apply_new_debit(account_id, &secret, &pending_credit(account_id, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Failed(FailureCause::Domain(_))));
    }

    #[tokio::test]
    async fn currency_mismatch_leaves_account_untouched() {
        let fx = Fixture::new().await;
        let (account_id, secret) = fx.locked_account(open_account(Amount::galactic(1), None)).await;
        let mut tx = pending_credit(account_id, 1);
        tx.amount = Amount::wizarding(0, 1, 0).unwrap();

        let err = fx.ledger.apply_new_credit(account_id, &secret, &tx).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Failed(FailureCause::Ledger(LedgerError::Money(
                MoneyError::CurrencyMismatch { .. }
            )))
        ));
        let stored = fx.account(account_id).await;
        assert_eq!(stored.balances.len(), 1);
    }

    #[tokio::test]
    async fn persist_rechecks_the_secret() {
        let fx = Fixture::new().await;
        let (account_id, _secret) = fx.locked_account(open_account(Amount::galactic(1), None)).await;
        let err = fx
            .ledger
            .apply_new_debit(account_id, &LockSecret::new("stale"), &pending_debit(account_id, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Failed(FailureCause::Conflict(_))));
        assert_eq!(amount(&fx.account(account_id).await, BalanceKind::Expected), None);
    }
}
