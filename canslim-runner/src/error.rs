//! Driver error types.

use canslim_core::config::ConfigError;
use canslim_core::data::ProviderError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("no symbols to evaluate")]
    NoSymbols,

    #[error("backtest needs both a start and an end date")]
    MissingDateRange,

    #[error("backtest start {start} is after end {end}")]
    EmptyDateRange { start: NaiveDate, end: NaiveDate },
}

/// A symbol that could not be scored, kept alongside the batch results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolFailure {
    pub symbol: String,
    pub reason: String,
}

impl SymbolFailure {
    pub fn new(symbol: impl Into<String>, error: &RunError) -> Self {
        Self {
            symbol: symbol.into(),
            reason: error.to_string(),
        }
    }
}
