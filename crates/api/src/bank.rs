//! Boundary operations, transport-agnostic.
//!
//! Each operation maps service outcomes to [`ApiError`]. Mutating
//! transaction operations pass the lock gate before touching anything.

use std::sync::Arc;

use tracing::instrument;

use bankers_accounts::{Account, AccountChanges, LockSecret};
use bankers_core::{AccountId, TransactionId, UserId};
use bankers_infra::ServiceError;
use bankers_infra::services::{AccountService, LockManager, NewAccount, TransactionService};
use bankers_infra::store::accounts::AccountFilter;
use bankers_infra::store::{DocumentStore, InMemoryDocumentStore};
use bankers_infra::users::{StoredUserDirectory, User};
use bankers_transactions::{AccountTransactions, Transaction, TransactionFilter};

use crate::config::BankConfig;
use crate::dto::{
    BookTransactionRequest, LockAccountResponse, LockStatusResponse, NewCreditRequest,
    NewDebitRequest, RegisterUserRequest, ReleaseResponse,
};
use crate::errors::{ApiError, ApiErrorKind};

pub type AccountStore = Arc<dyn DocumentStore<Account>>;
pub type TransactionStore = Arc<dyn DocumentStore<Transaction>>;
pub type UserStore = Arc<dyn DocumentStore<User>>;

type Users = Arc<StoredUserDirectory<UserStore>>;

pub type ApiResult<T> = Result<T, ApiError>;

pub struct BankApi {
    accounts: AccountService<AccountStore>,
    locks: LockManager<AccountStore, Users>,
    transactions: TransactionService<TransactionStore, AccountStore>,
    users: Users,
}

impl BankApi {
    pub fn new(
        config: &BankConfig,
        accounts: AccountStore,
        transactions: TransactionStore,
        users: UserStore,
    ) -> Self {
        let users = Arc::new(StoredUserDirectory::new(users));
        Self {
            accounts: AccountService::new(accounts.clone(), config.char_overdraft),
            locks: LockManager::new(accounts.clone(), users.clone(), config.lock_secret_bytes),
            transactions: TransactionService::new(transactions, accounts),
            users,
        }
    }

    /// Wiring over fresh in-memory collections (dev/test).
    pub fn in_memory(config: &BankConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryDocumentStore::<Account>::new()),
            Arc::new(InMemoryDocumentStore::<Transaction>::new()),
            Arc::new(InMemoryDocumentStore::<User>::new()),
        )
    }

    // ─────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────

    pub async fn register_user(&self, req: RegisterUserRequest) -> ApiResult<User> {
        let user = User {
            user_id: UserId::new(),
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
        };
        self.users
            .register(user.clone())
            .await
            .map_err(ServiceError::from)?;
        Ok(user)
    }

    pub async fn get_user(&self, user_id: UserId) -> ApiResult<User> {
        self.users
            .get(user_id)
            .await
            .map_err(ServiceError::from)?
            .ok_or_else(|| ApiError::new(ApiErrorKind::NotFound, "not found"))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accounts
    // ─────────────────────────────────────────────────────────────────────

    pub async fn create_account(&self, new: NewAccount) -> ApiResult<Account> {
        Ok(self.accounts.create(new).await?)
    }

    pub async fn get_account(&self, account_id: AccountId) -> ApiResult<Account> {
        Ok(self.accounts.get(account_id).await?)
    }

    pub async fn search_accounts(&self, filter: AccountFilter) -> ApiResult<Vec<Account>> {
        Ok(self.accounts.search(filter).await?)
    }

    pub async fn update_account(
        &self,
        account_id: AccountId,
        lock_secret: &str,
        changes: AccountChanges,
    ) -> ApiResult<Account> {
        let secret = LockSecret::new(lock_secret);
        Ok(self.accounts.update(account_id, &secret, changes).await?)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Locks
    // ─────────────────────────────────────────────────────────────────────

    pub async fn acquire_lock(
        &self,
        account_id: AccountId,
        user_id: UserId,
    ) -> ApiResult<LockAccountResponse> {
        let outcome = self.locks.acquire(account_id, user_id).await?;
        Ok(LockAccountResponse::new(account_id, user_id, outcome))
    }

    pub async fn check_lock(
        &self,
        account_id: AccountId,
        lock_secret: &str,
    ) -> ApiResult<LockStatusResponse> {
        let state = self
            .locks
            .check(account_id, &LockSecret::new(lock_secret))
            .await?;
        Ok(state.into())
    }

    pub async fn release_lock(
        &self,
        account_id: AccountId,
        lock_secret: &str,
    ) -> ApiResult<ReleaseResponse> {
        let released = self
            .locks
            .release(account_id, &LockSecret::new(lock_secret))
            .await?;
        Ok(ReleaseResponse { released })
    }

    pub async fn force_release_lock(&self, account_id: AccountId) -> ApiResult<ReleaseResponse> {
        let released = self.locks.force_release(account_id).await?;
        Ok(ReleaseResponse { released })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Transactions
    // ─────────────────────────────────────────────────────────────────────

    #[instrument(skip(self, req), fields(account_id = %account_id))]
    pub async fn create_debit(
        &self,
        account_id: AccountId,
        req: NewDebitRequest,
    ) -> ApiResult<Transaction> {
        let secret = LockSecret::new(req.lock_secret.clone());
        self.locks.require(account_id, &secret).await?;
        Ok(self
            .transactions
            .create(account_id, &secret, req.into())
            .await?)
    }

    #[instrument(skip(self, req), fields(account_id = %account_id))]
    pub async fn create_credit(
        &self,
        account_id: AccountId,
        req: NewCreditRequest,
    ) -> ApiResult<Transaction> {
        let secret = LockSecret::new(req.lock_secret.clone());
        self.locks.require(account_id, &secret).await?;
        Ok(self
            .transactions
            .create(account_id, &secret, req.into())
            .await?)
    }

    #[instrument(skip(self, req), fields(account_id = %account_id, transaction_id = %req.transaction_id))]
    pub async fn book_transaction(
        &self,
        account_id: AccountId,
        req: BookTransactionRequest,
    ) -> ApiResult<Transaction> {
        let secret = LockSecret::new(req.lock_secret);
        self.locks.require(account_id, &secret).await?;
        Ok(self
            .transactions
            .book(account_id, &secret, req.transaction_id)
            .await?)
    }

    pub async fn search_transactions(
        &self,
        account_id: AccountId,
        filter: TransactionFilter,
    ) -> ApiResult<AccountTransactions> {
        Ok(self.transactions.search(account_id, filter).await?)
    }

    pub async fn get_transaction(
        &self,
        account_id: AccountId,
        transaction_id: TransactionId,
    ) -> ApiResult<Transaction> {
        Ok(self.transactions.get_one(account_id, transaction_id).await?)
    }
}
