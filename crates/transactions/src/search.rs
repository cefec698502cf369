//! Transaction search: filter predicate and booked/pending partitioning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bankers_accounts::AccountReference;

use crate::transaction::{BookingStatus, Transaction};

/// Search criteria within a single account.
///
/// `date_from` is inclusive, `date_to` exclusive. Both apply to the booking
/// date of booked rows and the entry date of pending rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub booking_status: Option<BookingStatus>,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        if self.booking_status.is_some_and(|s| s != tx.booking_status) {
            return false;
        }
        let at = tx.search_date();
        if self.date_from.is_some_and(|from| at < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| at >= to) {
            return false;
        }
        true
    }
}

/// Search result split by booking status.
///
/// When the search was restricted to one status, the other list is absent
/// rather than empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLists {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booked: Option<Vec<Transaction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<Vec<Transaction>>,
}

impl TransactionLists {
    pub fn partition(
        transactions: impl IntoIterator<Item = Transaction>,
        status: Option<BookingStatus>,
    ) -> Self {
        let (booked, pending): (Vec<_>, Vec<_>) = transactions
            .into_iter()
            .partition(|tx| tx.booking_status == BookingStatus::Booked);

        match status {
            Some(BookingStatus::Booked) => Self {
                booked: Some(booked),
                pending: None,
            },
            Some(BookingStatus::Pending) => Self {
                booked: None,
                pending: Some(pending),
            },
            None => Self {
                booked: Some(booked),
                pending: Some(pending),
            },
        }
    }

    pub fn len(&self) -> usize {
        self.booked.as_ref().map_or(0, Vec::len) + self.pending.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Search response: the account's reference alongside its transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTransactions {
    pub account: AccountReference,
    pub transactions: TransactionLists,
}
