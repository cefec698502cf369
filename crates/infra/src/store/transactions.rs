//! Transaction predicates and mutations.

use chrono::{DateTime, Utc};
use tracing::warn;

use bankers_core::{AccountId, TransactionId};
use bankers_transactions::{BookingStatus, Transaction, TransactionFilter};

use super::r#trait::{Filter, Update};

/// A specific transaction, scoped to the account it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InAccount {
    pub account_id: AccountId,
    pub transaction_id: TransactionId,
}

impl Filter<Transaction> for InAccount {
    fn matches(&self, tx: &Transaction) -> bool {
        tx.transaction_id == self.transaction_id && tx.associated_account_id == self.account_id
    }
}

/// Like [`InAccount`], restricted to rows that are still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingInAccount(pub InAccount);

impl Filter<Transaction> for PendingInAccount {
    fn matches(&self, tx: &Transaction) -> bool {
        self.0.matches(tx) && tx.booking_status == BookingStatus::Pending
    }
}

/// Like [`InAccount`], restricted to booked rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedInAccount(pub InAccount);

impl Filter<Transaction> for BookedInAccount {
    fn matches(&self, tx: &Transaction) -> bool {
        self.0.matches(tx) && tx.booking_status == BookingStatus::Booked
    }
}

/// All transactions of one account that pass a search filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSearch {
    pub account_id: AccountId,
    pub filter: TransactionFilter,
}

impl Filter<Transaction> for AccountSearch {
    fn matches(&self, tx: &Transaction) -> bool {
        tx.associated_account_id == self.account_id && self.filter.matches(tx)
    }
}

/// Flips a pending row to booked and stamps the booking date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkBooked {
    pub at: DateTime<Utc>,
}

impl Update<Transaction> for MarkBooked {
    fn apply(&self, tx: &mut Transaction) {
        if !tx.book(self.at) {
            warn!(transaction_id = %tx.transaction_id, "booking update matched an already booked row");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevertBooking;

impl Update<Transaction> for RevertBooking {
    fn apply(&self, tx: &mut Transaction) {
        tx.revert_booking();
    }
}
