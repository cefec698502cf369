//! Shared test fixtures.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use bankers_accounts::{
    Account, AccountReference, AccountStatus, CashAccountType, LockSecret, OpenAccount,
    RoutingNumbers, Usage,
};
use bankers_core::{AccountId, Entity, TransactionId, UserId};
use bankers_money::{Amount, Currency};
use bankers_transactions::{Direction, NewTransaction, Transaction};

use crate::services::{BalanceLedger, LockAcquisition, LockManager, TransactionService};
use crate::store::{
    ById, DocumentStore, Filter, InMemoryDocumentStore, StoreError, StoreResult, Update,
};
use crate::users::{StoredUserDirectory, User};

pub(crate) type Accounts = Arc<InMemoryDocumentStore<Account>>;
pub(crate) type Transactions = Arc<InMemoryDocumentStore<Transaction>>;
pub(crate) type Users = Arc<StoredUserDirectory<InMemoryDocumentStore<User>>>;

pub(crate) fn open_account(initial: Amount, limit: Option<Amount>) -> Account {
    Account::open(
        OpenAccount {
            resource_id: AccountId::new(),
            name: "Test".to_string(),
            product: "Checking".to_string(),
            cash_account_type: CashAccountType::Tran,
            status: AccountStatus::Enabled,
            usage: Usage::Priv,
            pan: "12345678".to_string(),
            msisdn: None,
            routing_numbers: RoutingNumbers::default(),
            initial_balance: initial,
            authorized_limit: limit,
        },
        Utc::now(),
    )
    .unwrap()
}

pub(crate) fn counterparty() -> AccountReference {
    AccountReference {
        pan: "87654321".to_string(),
        msisdn: None,
        currency: Currency::Gsc,
        routing_numbers: RoutingNumbers::default(),
    }
}

pub(crate) fn debit_of(amount: Amount) -> NewTransaction {
    NewTransaction {
        check_id: None,
        amount,
        direction: Direction::Debit {
            debtor_name: "Grocer".to_string(),
            debtor_account: counterparty(),
        },
    }
}

pub(crate) fn pending_debit(account_id: AccountId, amount: i64) -> Transaction {
    Transaction::pending(
        TransactionId::new(),
        account_id,
        debit_of(Amount::galactic(amount)),
        Utc::now(),
    )
    .unwrap()
}

pub(crate) fn pending_credit(account_id: AccountId, amount: i64) -> Transaction {
    let new = NewTransaction {
        check_id: None,
        amount: Amount::galactic(amount),
        direction: Direction::Credit {
            creditor_name: "Employer".to_string(),
            creditor_account: counterparty(),
            value_date: None,
        },
    };
    Transaction::pending(TransactionId::new(), account_id, new, Utc::now()).unwrap()
}

/// Wired services over fresh in-memory stores, with one registered user.
pub(crate) struct Fixture {
    pub accounts: Accounts,
    pub transaction_store: Transactions,
    pub locks: LockManager<Accounts, Users>,
    pub ledger: BalanceLedger<Accounts>,
    pub transactions: TransactionService<Transactions, Accounts>,
    pub user: UserId,
}

impl Fixture {
    pub async fn new() -> Self {
        let accounts: Accounts = Arc::new(InMemoryDocumentStore::new());
        let transaction_store: Transactions = Arc::new(InMemoryDocumentStore::new());
        let users: Users = Arc::new(StoredUserDirectory::in_memory());

        let user = UserId::new();
        users
            .register(User {
                user_id: user,
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: "test@example.com".to_string(),
            })
            .await
            .unwrap();

        Self {
            locks: LockManager::new(accounts.clone(), users, 16),
            ledger: BalanceLedger::new(accounts.clone()),
            transactions: TransactionService::new(transaction_store.clone(), accounts.clone()),
            accounts,
            transaction_store,
            user,
        }
    }

    pub async fn insert_account(&self, account: Account) -> AccountId {
        let id = *account.id();
        self.accounts.insert_one(account).await.unwrap();
        id
    }

    pub async fn lock(&self, account_id: AccountId) -> LockSecret {
        match self.locks.acquire(account_id, self.user).await.unwrap() {
            LockAcquisition::Acquired { secret } => secret,
            LockAcquisition::NotAcquired => panic!("account {account_id} already locked"),
        }
    }

    pub async fn locked_account(&self, account: Account) -> (AccountId, LockSecret) {
        let id = self.insert_account(account).await;
        (id, self.lock(id).await)
    }

    pub async fn account(&self, account_id: AccountId) -> Account {
        self.accounts.find_one(&ById(account_id)).await.unwrap().unwrap()
    }
}

/// Store wrapper whose writes fail once a budget of successful writes is
/// spent. Only `update_one` and `delete_one` count as writes; inserts pass.
pub(crate) struct FailingWrites<S> {
    inner: S,
    writes_left: AtomicUsize,
}

impl<S> FailingWrites<S> {
    /// Every update and delete fails.
    pub fn new(inner: S) -> Self {
        Self::after(inner, 0)
    }

    /// The first `writes` updates or deletes go through.
    pub fn after(inner: S, writes: usize) -> Self {
        Self {
            inner,
            writes_left: AtomicUsize::new(writes),
        }
    }

    fn spend(&self) -> StoreResult<()> {
        self.writes_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .map(|_| ())
            .map_err(|_| StoreError::Unavailable("injected write fault".to_string()))
    }
}

#[async_trait::async_trait]
impl<D, S> DocumentStore<D> for FailingWrites<S>
where
    D: Entity + Send + Sync + 'static,
    S: DocumentStore<D>,
{
    async fn find_one(&self, filter: &dyn Filter<D>) -> StoreResult<Option<D>> {
        self.inner.find_one(filter).await
    }

    async fn find_many(&self, filter: &dyn Filter<D>) -> StoreResult<Vec<D>> {
        self.inner.find_many(filter).await
    }

    async fn insert_one(&self, doc: D) -> StoreResult<()> {
        self.inner.insert_one(doc).await
    }

    async fn delete_one(&self, filter: &dyn Filter<D>) -> StoreResult<bool> {
        self.spend()?;
        self.inner.delete_one(filter).await
    }

    async fn update_one(
        &self,
        filter: &dyn Filter<D>,
        update: &dyn Update<D>,
    ) -> StoreResult<Option<D>> {
        self.spend()?;
        self.inner.update_one(filter, update).await
    }
}

/// Store wrapper remembering the id of every inserted document.
pub(crate) struct InsertLog<S, I> {
    inner: S,
    ids: Mutex<Vec<I>>,
}

impl<S, I: Clone> InsertLog<S, I> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            ids: Mutex::new(Vec::new()),
        }
    }

    pub fn inserted(&self) -> Vec<I> {
        self.ids.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl<D, S> DocumentStore<D> for InsertLog<S, D::Id>
where
    D: Entity + Send + Sync + 'static,
    D::Id: Send + Sync,
    S: DocumentStore<D>,
{
    async fn find_one(&self, filter: &dyn Filter<D>) -> StoreResult<Option<D>> {
        self.inner.find_one(filter).await
    }

    async fn find_many(&self, filter: &dyn Filter<D>) -> StoreResult<Vec<D>> {
        self.inner.find_many(filter).await
    }

    async fn insert_one(&self, doc: D) -> StoreResult<()> {
        let id = doc.id().clone();
        self.inner.insert_one(doc).await?;
        self.ids.lock().unwrap().push(id);
        Ok(())
    }

    async fn delete_one(&self, filter: &dyn Filter<D>) -> StoreResult<bool> {
        self.inner.delete_one(filter).await
    }

    async fn update_one(
        &self,
        filter: &dyn Filter<D>,
        update: &dyn Update<D>,
    ) -> StoreResult<Option<D>> {
        self.inner.update_one(filter, update).await
    }
}
