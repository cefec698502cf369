//! Process configuration, read from the environment.

use anyhow::{Context, ensure};

use bankers_infra::services::MIN_SECRET_BYTES;

pub const LOCK_SECRET_BYTES_ENV: &str = "BANKERS_LOCK_SECRET_BYTES";
pub const CHAR_OVERDRAFT_ENV: &str = "BANKERS_CHAR_OVERDRAFT";
pub const LOG_ENV: &str = "BANKERS_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankConfig {
    /// Random bytes per generated lock secret.
    pub lock_secret_bytes: usize,
    /// Authorised limit for `CHAR` accounts opened without one, in the
    /// account currency's smallest unit.
    pub char_overdraft: i128,
    /// Tracing filter directives; `None` defers to `RUST_LOG`.
    pub log_filter: Option<String>,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            lock_secret_bytes: 32,
            char_overdraft: 1000,
            log_filter: None,
        }
    }
}

impl BankConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(LOCK_SECRET_BYTES_ENV) {
            config.lock_secret_bytes = raw
                .trim()
                .parse()
                .with_context(|| format!("{LOCK_SECRET_BYTES_ENV} must be a positive integer, got {raw:?}"))?;
            ensure!(
                config.lock_secret_bytes >= MIN_SECRET_BYTES,
                "{LOCK_SECRET_BYTES_ENV} must be at least {MIN_SECRET_BYTES}, got {}",
                config.lock_secret_bytes
            );
        }

        if let Some(raw) = lookup(CHAR_OVERDRAFT_ENV) {
            config.char_overdraft = raw
                .trim()
                .parse()
                .with_context(|| format!("{CHAR_OVERDRAFT_ENV} must be an integer, got {raw:?}"))?;
            ensure!(
                config.char_overdraft >= 0,
                "{CHAR_OVERDRAFT_ENV} must not be negative"
            );
        }

        config.log_filter = lookup(LOG_ENV).filter(|f| !f.trim().is_empty());
        Ok(config)
    }
}
