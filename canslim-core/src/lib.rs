//! CANSLIM core: scoring engine, ranking, market regime, setup detection.
//!
//! This crate contains everything needed to score one symbol on one date:
//! - Domain types (price bars, fundamental snapshots, ownership)
//! - Data access traits and the universe resolver
//! - Relative-strength ranking with a date-keyed single-flight cache
//! - Market regime classification from a benchmark series
//! - Component evaluators C, A, N, S, I, L and the composite scorer
//! - Trend qualification and pullback entry detection
//!
//! Nothing here performs I/O beyond reading configuration files; price and
//! fundamental data arrive through the [`data`] traits.

pub mod components;
pub mod composite;
pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod market;
pub mod ranking;
pub mod statements;
pub mod trend;

pub use composite::{
    composite_score, evaluate_canslim, CanslimResult, ComponentScores, RawMetrics, SymbolInputs,
    MIN_EVALUATION_BARS,
};
pub use config::{ConfigError, EngineConfig};
pub use market::MarketTrend;
pub use ranking::{RsCache, RsRanker, RsSnapshot};
pub use trend::{PullbackDetector, TrendSignal, TrendStrength};
