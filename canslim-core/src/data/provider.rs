//! Provider traits and structured error types.
//!
//! The engine never fetches anything itself. Drivers hand it already-resolved
//! in-memory data through these traits, so sources can be swapped and mocked.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Fundamentals, OwnershipHistory, PriceBar, Symbol};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("insufficient history for {symbol}: {have} bars, need {need}")]
    InsufficientHistory {
        symbol: String,
        have: usize,
        need: usize,
    },

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider error: {0}")]
    Other(String),
}

/// Daily OHLCV history.
pub trait PriceHistory: Send + Sync {
    /// Bars ascending by date. With `as_of`, nothing dated after it is returned.
    fn bars(&self, symbol: &str, as_of: Option<NaiveDate>) -> Result<Vec<PriceBar>, ProviderError>;
}

/// Income statements, balance sheet and share count.
pub trait FundamentalsSource: Send + Sync {
    fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, ProviderError>;
}

/// Institutional ownership; an empty history means "no data".
pub trait OwnershipSource: Send + Sync {
    fn ownership(&self, symbol: &str) -> Result<OwnershipHistory, ProviderError>;
}

/// Reference universe for relative-strength ranking.
pub trait PeerUniverse: Send + Sync {
    fn peers(&self, as_of: Option<NaiveDate>) -> Result<Vec<Symbol>, ProviderError>;
}

/// Everything a screening or backtest driver needs from one source.
pub trait MarketData: PriceHistory + FundamentalsSource + OwnershipSource + PeerUniverse {}

impl<T> MarketData for T where T: PriceHistory + FundamentalsSource + OwnershipSource + PeerUniverse {}
