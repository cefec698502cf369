use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bankers_accounts::{AccountReference, EntrySide, LedgerEntry};
use bankers_core::{AccountId, DomainError, DomainResult, Entity, TransactionId};
use bankers_money::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Booked,
}

/// Direction of a transaction with its direction-specific counterparty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "transactionType",
    rename_all = "UPPERCASE",
    rename_all_fields = "camelCase"
)]
pub enum Direction {
    Debit {
        debtor_name: String,
        debtor_account: AccountReference,
    },
    Credit {
        creditor_name: String,
        creditor_account: AccountReference,
        value_date: Option<DateTime<Utc>>,
    },
}

impl Direction {
    pub fn side(&self) -> EntrySide {
        match self {
            Direction::Debit { .. } => EntrySide::Debit,
            Direction::Credit { .. } => EntrySide::Credit,
        }
    }

    pub fn counterparty_name(&self) -> &str {
        match self {
            Direction::Debit { debtor_name, .. } => debtor_name,
            Direction::Credit { creditor_name, .. } => creditor_name,
        }
    }
}

/// Caller-supplied part of a new transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub check_id: Option<String>,
    pub amount: Amount,
    #[serde(flatten)]
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub associated_account_id: AccountId,
    pub check_id: Option<String>,
    pub amount: Amount,
    pub entry_date: DateTime<Utc>,
    pub booking_date: Option<DateTime<Utc>>,
    pub booking_status: BookingStatus,
    #[serde(flatten)]
    pub direction: Direction,
}

impl Entity for Transaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.transaction_id
    }
}

impl Transaction {
    /// A freshly entered, not yet settled transaction.
    pub fn pending(
        transaction_id: TransactionId,
        account_id: AccountId,
        new: NewTransaction,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if new.direction.counterparty_name().trim().is_empty() {
            return Err(DomainError::validation("counterparty name must not be empty"));
        }
        Ok(Self {
            transaction_id,
            associated_account_id: account_id,
            check_id: new.check_id,
            amount: new.amount,
            entry_date: now,
            booking_date: None,
            booking_status: BookingStatus::Pending,
            direction: new.direction,
        })
    }

    pub fn side(&self) -> EntrySide {
        self.direction.side()
    }

    pub fn is_pending(&self) -> bool {
        self.booking_status == BookingStatus::Pending
    }

    /// Ledger facts of this transaction, stamped with `at`.
    pub fn ledger_entry(&self, at: DateTime<Utc>) -> LedgerEntry {
        LedgerEntry {
            transaction_id: self.transaction_id,
            side: self.side(),
            amount: self.amount,
            at,
        }
    }

    /// `Pending → Booked`, the only forward transition. Returns whether the
    /// row moved; an already booked row keeps its first booking date.
    pub fn book(&mut self, at: DateTime<Utc>) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.booking_status = BookingStatus::Booked;
        self.booking_date = Some(at);
        true
    }

    /// Compensating `Booked → Pending` after a failed ledger update.
    pub fn revert_booking(&mut self) {
        self.booking_status = BookingStatus::Pending;
        self.booking_date = None;
    }

    /// Timestamp used for date-range searches: booking date for booked rows,
    /// entry date for pending rows.
    pub fn search_date(&self) -> DateTime<Utc> {
        match self.booking_status {
            BookingStatus::Booked => self.booking_date.unwrap_or(self.entry_date),
            BookingStatus::Pending => self.entry_date,
        }
    }
}
