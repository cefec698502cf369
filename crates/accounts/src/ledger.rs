//! Balance projections driven by transaction events.
//!
//! Three views are maintained on the account record:
//!
//! - `closingBooked`: always present, moved only by booked transactions.
//! - `expected`: seeded from `closingBooked` by the first pending transaction,
//!   dropped once booking brings `closingBooked` level with it again.
//! - `authorised`: only with an authorized limit; recomputed as
//!   `expected + limit` on every pending transaction, never accumulated.
//!
//! Each operation must be applied exactly once per transaction event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bankers_core::TransactionId;
use bankers_money::{Amount, MoneyError};

use crate::account::Account;
use crate::balance::{Balance, BalanceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntrySide {
    Debit,
    Credit,
}

/// The ledger-relevant facts of one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    pub transaction_id: TransactionId,
    pub side: EntrySide,
    pub amount: Amount,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("account has no closingBooked balance")]
    MissingClosingBooked,

    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl LedgerEntry {
    fn apply_to(&self, amount: &Amount) -> Result<Amount, MoneyError> {
        match self.side {
            EntrySide::Debit => amount.checked_sub(&self.amount),
            EntrySide::Credit => amount.checked_add(&self.amount),
        }
    }

    fn stamp(&self, mut balance: Balance, amount: Amount) -> Balance {
        balance.amount = amount;
        balance.last_change_at = self.at;
        balance.last_committed_transaction = Some(self.transaction_id);
        balance
    }
}

impl Account {
    /// A new pending debit/credit: moves `expected` (and re-derives `authorised`).
    pub fn apply_pending(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        let closing = self
            .balances
            .get(BalanceKind::ClosingBooked)
            .ok_or(LedgerError::MissingClosingBooked)?;

        let seed = match self.balances.get(BalanceKind::Expected) {
            Some(expected) => expected.clone(),
            None => closing.seeded_as(BalanceKind::Expected),
        };

        let expected_amount = entry.apply_to(&seed.amount)?;
        let authorised = match self.authorized_limit {
            Some(limit) => {
                let amount = expected_amount.checked_add(&limit)?;
                let seed = match self.balances.get(BalanceKind::Authorised) {
                    Some(existing) => existing.clone(),
                    None => seed.seeded_as(BalanceKind::Authorised),
                };
                Some(entry.stamp(seed, amount))
            }
            None => None,
        };

        self.balances.upsert(entry.stamp(seed, expected_amount));
        if let Some(authorised) = authorised {
            self.balances.upsert(authorised);
        }
        self.last_modified_at = entry.at;
        Ok(())
    }

    /// A pending transaction became booked: moves `closingBooked` and retires
    /// `expected` once nothing is outstanding.
    pub fn apply_booked(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        let closing = self
            .balances
            .get(BalanceKind::ClosingBooked)
            .ok_or(LedgerError::MissingClosingBooked)?
            .clone();

        let closing_amount = entry.apply_to(&closing.amount)?;
        let settled = match self.balances.get(BalanceKind::Expected) {
            Some(expected) => expected.amount.equals(&closing_amount)?,
            None => false,
        };

        self.balances.upsert(entry.stamp(closing, closing_amount));
        if settled {
            self.balances.remove(BalanceKind::Expected);
        }
        self.last_modified_at = entry.at;
        Ok(())
    }
}
