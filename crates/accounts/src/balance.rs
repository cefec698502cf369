use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bankers_core::{DomainError, TransactionId, ValueObject};
use bankers_money::Amount;

/// Which projection of the account a balance represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BalanceKind {
    /// Settled balance: only booked transactions.
    ClosingBooked,
    /// Settled balance plus pending activity.
    Expected,
    /// Expected balance plus the authorised credit limit.
    Authorised,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub kind: BalanceKind,
    pub amount: Amount,
    pub credit_limit_included: bool,
    pub last_change_at: DateTime<Utc>,
    pub last_committed_transaction: Option<TransactionId>,
}

impl ValueObject for Balance {}

impl Balance {
    pub fn new(kind: BalanceKind, amount: Amount, at: DateTime<Utc>) -> Self {
        Self {
            kind,
            amount,
            credit_limit_included: kind == BalanceKind::Authorised,
            last_change_at: at,
            last_committed_transaction: None,
        }
    }

    /// Copy of this balance re-labelled as another kind.
    pub fn seeded_as(&self, kind: BalanceKind) -> Self {
        Self {
            kind,
            credit_limit_included: kind == BalanceKind::Authorised,
            ..self.clone()
        }
    }
}

/// Embedded balance collection holding at most one balance per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Balance>", into = "Vec<Balance>")]
pub struct Balances(Vec<Balance>);

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: BalanceKind) -> Option<&Balance> {
        self.0.iter().find(|b| b.kind == kind)
    }

    /// Insert or replace the balance of `balance.kind`.
    pub fn upsert(&mut self, balance: Balance) {
        match self.0.iter_mut().find(|b| b.kind == balance.kind) {
            Some(existing) => *existing = balance,
            None => self.0.push(balance),
        }
    }

    pub fn remove(&mut self, kind: BalanceKind) -> Option<Balance> {
        let idx = self.0.iter().position(|b| b.kind == kind)?;
        Some(self.0.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Balance> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Balance>> for Balances {
    type Error = DomainError;

    fn try_from(value: Vec<Balance>) -> Result<Self, Self::Error> {
        let mut balances = Balances::new();
        for balance in value {
            if balances.get(balance.kind).is_some() {
                return Err(DomainError::invariant(format!(
                    "duplicate balance of kind {:?}",
                    balance.kind
                )));
            }
            balances.0.push(balance);
        }
        Ok(balances)
    }
}

impl From<Balances> for Vec<Balance> {
    fn from(value: Balances) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(kind: BalanceKind, amount: i64) -> Balance {
        Balance::new(kind, Amount::galactic(amount), Utc::now())
    }

    #[test]
    fn upsert_replaces_same_kind() {
        let mut balances = Balances::new();
        balances.upsert(balance(BalanceKind::Expected, 1));
        balances.upsert(balance(BalanceKind::Expected, 2));
        assert_eq!(balances.len(), 1);
        assert_eq!(
            balances.get(BalanceKind::Expected).unwrap().amount,
            Amount::galactic(2)
        );
    }

    #[test]
    fn duplicate_kinds_are_rejected_on_deserialize() {
        let dup = vec![
            balance(BalanceKind::ClosingBooked, 1),
            balance(BalanceKind::ClosingBooked, 2),
        ];
        let json = serde_json::to_string(&dup).unwrap();
        assert!(serde_json::from_str::<Balances>(&json).is_err());
    }

    #[test]
    fn seeded_copy_is_independent() {
        let closing = balance(BalanceKind::ClosingBooked, 100);
        let mut expected = closing.seeded_as(BalanceKind::Expected);
        expected.amount = Amount::galactic(70);
        assert_eq!(closing.amount, Amount::galactic(100));
        assert!(!expected.credit_limit_included);
        assert!(closing.seeded_as(BalanceKind::Authorised).credit_limit_included);
    }

    #[test]
    fn kinds_serialize_camel_case() {
        assert_eq!(
            serde_json::to_string(&BalanceKind::ClosingBooked).unwrap(),
            "\"closingBooked\""
        );
    }
}
