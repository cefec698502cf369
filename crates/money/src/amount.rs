use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bankers_core::ValueObject;

use crate::{Currency, MoneyError, MoneyResult};

/// An amount of money in exactly one currency system.
///
/// Multi-denomination variants are kept normalised by every constructor and
/// arithmetic operation: all components share the sign of the total and each
/// lower denomination is smaller (in magnitude) than its conversion ratio.
/// Enum fields are public, so a hand-built value may be unnormalised;
/// [`Amount::equals`] compares smallest units and is therefore the
/// comparison the ledger relies on.
///
/// `Amount` is `Copy`: every copy is an independent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "currency", try_from = "RawAmount")]
pub enum Amount {
    #[serde(rename = "GSC")]
    Galactic { amount: i64 },
    #[serde(rename = "BLC")]
    BluCoin {
        tuns: i64,
        scraposts: i64,
        katts: i64,
        kibels: i64,
    },
    #[serde(rename = "WIZ")]
    Wizarding {
        galleons: i64,
        sickles: i64,
        knuts: i64,
    },
}

impl ValueObject for Amount {}

impl Amount {
    pub const fn galactic(amount: i64) -> Self {
        Amount::Galactic { amount }
    }

    pub fn blu_coin(tuns: i64, scraposts: i64, katts: i64, kibels: i64) -> MoneyResult<Self> {
        Amount::BluCoin {
            tuns,
            scraposts,
            katts,
            kibels,
        }
        .normalized()
    }

    pub fn wizarding(galleons: i64, sickles: i64, knuts: i64) -> MoneyResult<Self> {
        Amount::Wizarding {
            galleons,
            sickles,
            knuts,
        }
        .normalized()
    }

    /// Build an amount from a count of the currency's smallest unit.
    pub fn from_smallest_units(currency: Currency, total: i128) -> MoneyResult<Self> {
        Ok(match currency {
            Currency::Gsc => {
                let [amount] = decompose::<1>(currency, total)?;
                Amount::Galactic { amount }
            }
            Currency::Blc => {
                let [tuns, scraposts, katts, kibels] = decompose::<4>(currency, total)?;
                Amount::BluCoin {
                    tuns,
                    scraposts,
                    katts,
                    kibels,
                }
            }
            Currency::Wiz => {
                let [galleons, sickles, knuts] = decompose::<3>(currency, total)?;
                Amount::Wizarding {
                    galleons,
                    sickles,
                    knuts,
                }
            }
        })
    }

    pub fn currency(&self) -> Currency {
        match self {
            Amount::Galactic { .. } => Currency::Gsc,
            Amount::BluCoin { .. } => Currency::Blc,
            Amount::Wizarding { .. } => Currency::Wiz,
        }
    }

    /// Total value expressed in the smallest denomination.
    pub fn smallest_units(&self) -> i128 {
        let ratios = self.currency().ratios();
        match *self {
            Amount::Galactic { amount } => compose(ratios, &[amount]),
            Amount::BluCoin {
                tuns,
                scraposts,
                katts,
                kibels,
            } => compose(ratios, &[tuns, scraposts, katts, kibels]),
            Amount::Wizarding {
                galleons,
                sickles,
                knuts,
            } => compose(ratios, &[galleons, sickles, knuts]),
        }
    }

    pub fn normalized(&self) -> MoneyResult<Self> {
        Self::from_smallest_units(self.currency(), self.smallest_units())
    }

    pub fn is_negative(&self) -> bool {
        self.smallest_units() < 0
    }

    pub fn checked_add(&self, other: &Amount) -> MoneyResult<Amount> {
        let currency = self.same_currency(other)?;
        let total = self
            .smallest_units()
            .checked_add(other.smallest_units())
            .ok_or(MoneyError::Overflow(currency))?;
        Self::from_smallest_units(currency, total)
    }

    pub fn checked_sub(&self, other: &Amount) -> MoneyResult<Amount> {
        let currency = self.same_currency(other)?;
        let total = self
            .smallest_units()
            .checked_sub(other.smallest_units())
            .ok_or(MoneyError::Overflow(currency))?;
        Self::from_smallest_units(currency, total)
    }

    /// Numeric equality within one currency system.
    pub fn equals(&self, other: &Amount) -> MoneyResult<bool> {
        self.same_currency(other)?;
        Ok(self.smallest_units() == other.smallest_units())
    }

    /// Value expressed in the currency's largest denomination.
    ///
    /// Informational only; ledger comparisons use [`Amount::equals`].
    pub fn to_reference_units(&self) -> MoneyResult<Decimal> {
        let currency = self.currency();
        let total = Decimal::try_from_i128_with_scale(self.smallest_units(), 0)
            .map_err(|_| MoneyError::Overflow(currency))?;
        let per_reference = Decimal::from(currency.smallest_units_per_reference() as i64);
        total
            .checked_div(per_reference)
            .ok_or(MoneyError::Overflow(currency))
    }

    fn same_currency(&self, other: &Amount) -> MoneyResult<Currency> {
        let (left, right) = (self.currency(), other.currency());
        if left != right {
            return Err(MoneyError::CurrencyMismatch { left, right });
        }
        Ok(left)
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Amount::Galactic { amount } => write!(f, "{amount} GSC"),
            Amount::BluCoin {
                tuns,
                scraposts,
                katts,
                kibels,
            } => write!(f, "{tuns}t {scraposts}s {katts}k {kibels}kb BLC"),
            Amount::Wizarding {
                galleons,
                sickles,
                knuts,
            } => write!(f, "{galleons}g {sickles}s {knuts}k WIZ"),
        }
    }
}

fn compose(ratios: &[i128], parts: &[i64]) -> i128 {
    let Some((first, rest)) = parts.split_first() else {
        return 0;
    };
    rest.iter()
        .zip(ratios)
        .fold(*first as i128, |acc, (part, ratio)| acc * ratio + *part as i128)
}

/// Split a smallest-unit total into denominations, largest first.
///
/// Truncating division keeps every component on the sign of `total`.
fn decompose<const N: usize>(currency: Currency, total: i128) -> MoneyResult<[i64; N]> {
    let ratios = currency.ratios();
    debug_assert_eq!(ratios.len() + 1, N);

    let mut parts = [0i64; N];
    let mut rest = total;
    for (slot, ratio) in parts[1..].iter_mut().rev().zip(ratios.iter().rev()) {
        *slot = narrow(currency, rest % ratio)?;
        rest /= ratio;
    }
    parts[0] = narrow(currency, rest)?;
    Ok(parts)
}

fn narrow(currency: Currency, value: i128) -> MoneyResult<i64> {
    i64::try_from(value).map_err(|_| MoneyError::Overflow(currency))
}

/// Wire shape accepted on input; normalised into [`Amount`] on the way in.
#[derive(Deserialize)]
#[serde(tag = "currency")]
enum RawAmount {
    #[serde(rename = "GSC")]
    Galactic { amount: i64 },
    #[serde(rename = "BLC")]
    BluCoin {
        tuns: i64,
        scraposts: i64,
        katts: i64,
        kibels: i64,
    },
    #[serde(rename = "WIZ")]
    Wizarding {
        galleons: i64,
        sickles: i64,
        knuts: i64,
    },
}

impl TryFrom<RawAmount> for Amount {
    type Error = MoneyError;

    fn try_from(raw: RawAmount) -> Result<Self, Self::Error> {
        match raw {
            RawAmount::Galactic { amount } => Ok(Amount::galactic(amount)),
            RawAmount::BluCoin {
                tuns,
                scraposts,
                katts,
                kibels,
            } => Amount::blu_coin(tuns, scraposts, katts, kibels),
            RawAmount::Wizarding {
                galleons,
                sickles,
                knuts,
            } => Amount::wizarding(galleons, sickles, knuts),
        }
    }
}
