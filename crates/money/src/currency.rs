use serde::{Deserialize, Serialize};

/// Closed set of currency systems an account can be denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Galactic Standard Currency: a single integer unit.
    Gsc,
    /// BluCoin: tuns / scraposts / katts / kibels.
    Blc,
    /// Wizarding: galleons / sickles / knuts.
    Wiz,
}

impl Currency {
    /// Conversion ratio between each denomination and the next smaller one,
    /// largest denomination first.
    pub const fn ratios(self) -> &'static [i128] {
        match self {
            Currency::Gsc => &[],
            // 1 tun = 20 scraposts, 1 scrapost = 12 katts, 1 katt = 8 kibels
            Currency::Blc => &[20, 12, 8],
            // 1 galleon = 17 sickles, 1 sickle = 29 knuts
            Currency::Wiz => &[17, 29],
        }
    }

    /// Number of smallest units in one reference unit (the largest denomination).
    pub fn smallest_units_per_reference(self) -> i128 {
        self.ratios().iter().product()
    }

    pub fn code(self) -> &'static str {
        match self {
            Currency::Gsc => "GSC",
            Currency::Blc => "BLC",
            Currency::Wiz => "WIZ",
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}
