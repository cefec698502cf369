//! Boundary API: request/response mapping, stable errors and configuration.
//!
//! Transport-agnostic: a caller (HTTP, CLI, tests) drives [`BankApi`]
//! directly with typed requests.

pub mod bank;
pub mod config;
pub mod dto;
pub mod errors;

pub use bank::{ApiResult, BankApi};
pub use config::BankConfig;
pub use errors::{ApiError, ApiErrorKind};

/// Load configuration from the environment, install tracing and wire an
/// in-memory [`BankApi`].
pub fn bootstrap() -> anyhow::Result<BankApi> {
    let config = BankConfig::from_env()?;
    bankers_observability::init_with_filter(config.log_filter.as_deref());
    tracing::info!(
        lock_secret_bytes = config.lock_secret_bytes,
        char_overdraft = %config.char_overdraft,
        "bank api configured"
    );
    Ok(BankApi::in_memory(&config))
}
