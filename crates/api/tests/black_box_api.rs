use std::sync::Arc;

use bankers_accounts::{
    AccountChanges, AccountReference, AccountStatus, BalanceKind, CashAccountType, RoutingNumbers,
    Usage,
};
use bankers_api::dto::{
    BookTransactionRequest, NewCreditRequest, NewDebitRequest, RegisterUserRequest,
};
use bankers_api::{ApiErrorKind, BankApi, BankConfig};
use bankers_core::{AccountId, TransactionId, UserId};
use bankers_infra::NewAccount;
use bankers_infra::store::accounts::AccountFilter;
use bankers_money::{Amount, Currency};
use bankers_transactions::{BookingStatus, TransactionFilter};

struct Harness {
    api: BankApi,
    user: UserId,
}

impl Harness {
    async fn new() -> Self {
        let api = BankApi::in_memory(&BankConfig::default());
        let user = api
            .register_user(RegisterUserRequest {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                email: "grace@example.com".to_string(),
            })
            .await
            .unwrap()
            .user_id;
        Self { api, user }
    }

    async fn open(&self, initial: Amount, kind: CashAccountType) -> AccountId {
        self.api
            .create_account(NewAccount {
                name: "Everyday".to_string(),
                product: "Checking".to_string(),
                cash_account_type: kind,
                usage: Usage::Priv,
                msisdn: Some("+15550100".to_string()),
                status: None,
                initial_balance: initial,
                authorized_limit: None,
            })
            .await
            .unwrap()
            .resource_id
    }

    async fn lock(&self, account_id: AccountId) -> String {
        let res = self.api.acquire_lock(account_id, self.user).await.unwrap();
        assert!(res.got_lock);
        res.secret.unwrap()
    }

    async fn balance(&self, account_id: AccountId, kind: BalanceKind) -> Option<Amount> {
        let account = self.api.get_account(account_id).await.unwrap();
        account.balance(kind).map(|b| b.amount)
    }
}

fn counterparty() -> AccountReference {
    AccountReference {
        pan: "11112222".to_string(),
        msisdn: None,
        currency: Currency::Gsc,
        routing_numbers: RoutingNumbers::default(),
    }
}

fn debit(secret: &str, amount: Amount) -> NewDebitRequest {
    NewDebitRequest {
        lock_secret: secret.to_string(),
        check_id: None,
        amount,
        debtor_name: "Corner Shop".to_string(),
        debtor_account: counterparty(),
    }
}

fn credit(secret: &str, amount: Amount) -> NewCreditRequest {
    NewCreditRequest {
        lock_secret: secret.to_string(),
        check_id: Some("1001".to_string()),
        amount,
        creditor_name: "Payroll".to_string(),
        creditor_account: counterparty(),
        value_date: None,
    }
}

#[tokio::test]
async fn lock_round_trip() {
    let h = Harness::new().await;
    let account = h.open(Amount::galactic(100), CashAccountType::Tran).await;
    let secret = h.lock(account).await;

    let status = h.api.check_lock(account, &secret).await.unwrap();
    assert!(status.locked && status.secret_matches);
    let status = h.api.check_lock(account, "guess").await.unwrap();
    assert!(status.locked && !status.secret_matches);

    assert!(!h.api.release_lock(account, "guess").await.unwrap().released);
    assert!(h.api.release_lock(account, &secret).await.unwrap().released);
    let status = h.api.check_lock(account, &secret).await.unwrap();
    assert!(!status.locked && !status.secret_matches);
}

#[tokio::test]
async fn debit_and_book_move_balances() {
    let h = Harness::new().await;
    let account = h.open(Amount::galactic(100), CashAccountType::Tran).await;
    let secret = h.lock(account).await;

    let tx = h
        .api
        .create_debit(account, debit(&secret, Amount::galactic(30)))
        .await
        .unwrap();
    assert_eq!(h.balance(account, BalanceKind::Expected).await, Some(Amount::galactic(70)));
    assert_eq!(
        h.balance(account, BalanceKind::ClosingBooked).await,
        Some(Amount::galactic(100))
    );

    let booked = h
        .api
        .book_transaction(
            account,
            BookTransactionRequest {
                lock_secret: secret.clone(),
                transaction_id: tx.transaction_id,
            },
        )
        .await
        .unwrap();
    assert_eq!(booked.booking_status, BookingStatus::Booked);
    assert_eq!(
        h.balance(account, BalanceKind::ClosingBooked).await,
        Some(Amount::galactic(70))
    );
    assert_eq!(h.balance(account, BalanceKind::Expected).await, None);

    let again = h
        .api
        .book_transaction(
            account,
            BookTransactionRequest {
                lock_secret: secret,
                transaction_id: tx.transaction_id,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(again.kind, ApiErrorKind::BadRequest);
    assert_eq!(again.message, "Failed to find matching transaction to book.");
}

#[tokio::test]
async fn charge_account_overdraft_covers_negative_expected() {
    let h = Harness::new().await;
    let account = h.open(Amount::galactic(100), CashAccountType::Char).await;
    let secret = h.lock(account).await;

    h.api
        .create_debit(account, debit(&secret, Amount::galactic(120)))
        .await
        .unwrap();
    assert_eq!(h.balance(account, BalanceKind::Expected).await, Some(Amount::galactic(-20)));
    assert_eq!(
        h.balance(account, BalanceKind::Authorised).await,
        Some(Amount::galactic(980))
    );
}

#[tokio::test]
async fn lock_gate_messages() {
    let h = Harness::new().await;
    let account = h.open(Amount::galactic(100), CashAccountType::Tran).await;

    let err = h
        .api
        .create_debit(account, debit("none", Amount::galactic(1)))
        .await
        .unwrap_err();
    assert_eq!(err.message, "Account must be locked to update");

    h.lock(account).await;
    let err = h
        .api
        .create_credit(account, credit("stolen", Amount::galactic(1)))
        .await
        .unwrap_err();
    assert_eq!(err.message, "Account is locked by another user");

    let err = h
        .api
        .create_debit(AccountId::new(), debit("none", Amount::galactic(1)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::BadRequest);
    assert_eq!(err.message, "Given account id does not exist.");
}

#[tokio::test]
async fn wrong_currency_is_rejected_without_side_effects() {
    let h = Harness::new().await;
    let account = h
        .open(Amount::blu_coin(3, 0, 0, 0).unwrap(), CashAccountType::Tran)
        .await;
    let secret = h.lock(account).await;

    let err = h
        .api
        .create_credit(account, credit(&secret, Amount::galactic(5)))
        .await
        .unwrap_err();
    assert_eq!(err.to_json()["message"], "Attempted to use the wrong Currency type");

    let found = h
        .api
        .search_transactions(account, TransactionFilter::default())
        .await
        .unwrap();
    assert!(found.transactions.is_empty());
    assert_eq!(found.account.currency, Currency::Blc);
}

#[tokio::test]
async fn disabled_account_rejects_transactions() {
    let h = Harness::new().await;
    let account = h.open(Amount::galactic(100), CashAccountType::Tran).await;
    let secret = h.lock(account).await;
    h.api
        .update_account(
            account,
            &secret,
            AccountChanges {
                status: Some(AccountStatus::Disabled),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = h
        .api
        .create_debit(account, debit(&secret, Amount::galactic(1)))
        .await
        .unwrap_err();
    assert_eq!(
        err.message,
        "Account is not enabled, and the requested action is only allowed on enabled accounts."
    );

    let disabled = h
        .api
        .search_accounts(AccountFilter {
            status: Some(AccountStatus::Disabled),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(disabled.len(), 1);
}

#[tokio::test]
async fn search_splits_booked_and_pending() {
    let h = Harness::new().await;
    let account = h.open(Amount::galactic(100), CashAccountType::Tran).await;
    let secret = h.lock(account).await;

    let first = h
        .api
        .create_credit(account, credit(&secret, Amount::galactic(10)))
        .await
        .unwrap();
    h.api
        .create_debit(account, debit(&secret, Amount::galactic(3)))
        .await
        .unwrap();
    h.api
        .book_transaction(
            account,
            BookTransactionRequest {
                lock_secret: secret.clone(),
                transaction_id: first.transaction_id,
            },
        )
        .await
        .unwrap();

    let all = h
        .api
        .search_transactions(account, TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(all.transactions.booked.as_ref().map(Vec::len), Some(1));
    assert_eq!(all.transactions.pending.as_ref().map(Vec::len), Some(1));

    let pending = h
        .api
        .search_transactions(
            account,
            TransactionFilter {
                booking_status: Some(BookingStatus::Pending),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let body = serde_json::to_value(&pending).unwrap();
    assert!(body["transactions"].get("booked").is_none());
    assert_eq!(body["transactions"]["pending"][0]["transactionType"], "DEBIT");

    assert_eq!(
        h.api
            .get_transaction(account, TransactionId::new())
            .await
            .unwrap_err()
            .kind,
        ApiErrorKind::NotFound
    );
}

#[tokio::test]
async fn unknown_user_cannot_lock() {
    let h = Harness::new().await;
    let account = h.open(Amount::galactic(1), CashAccountType::Tran).await;
    let err = h.api.acquire_lock(account, UserId::new()).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::BadRequest);

    let err = h.api.acquire_lock(AccountId::new(), h.user).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::NotFound);
}

#[tokio::test]
async fn force_release_recovers_abandoned_lock() {
    let h = Harness::new().await;
    let account = h.open(Amount::galactic(1), CashAccountType::Tran).await;
    h.lock(account).await;

    assert!(!h.api.acquire_lock(account, h.user).await.unwrap().got_lock);
    assert!(h.api.force_release_lock(account).await.unwrap().released);
    assert!(h.api.acquire_lock(account, h.user).await.unwrap().got_lock);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_lockers_get_one_secret() {
    let h = Arc::new(Harness::new().await);
    let account = h.open(Amount::galactic(1), CashAccountType::Tran).await;

    let attempts: Vec<_> = (0..24)
        .map(|_| {
            let h = h.clone();
            tokio::spawn(async move { h.api.acquire_lock(account, h.user).await.unwrap() })
        })
        .collect();

    let mut winners = 0;
    for attempt in attempts {
        if attempt.await.unwrap().got_lock {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}
