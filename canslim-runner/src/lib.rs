//! CANSLIM runner: screening and point-in-time backtests over `canslim-core`.
//!
//! This crate builds on `canslim-core` to provide:
//! - Run configuration loaded from TOML
//! - Screening on a bounded worker pool with isolated per-symbol failures
//! - Momentum setups (trend qualification + pullback entries) for leaders
//! - Backtests over a fixed evaluation schedule with per-symbol summaries
//! - CSV and JSON export
//! - Deterministic synthetic market data for tests and dry runs
//! - Tracing subscriber setup

pub mod backtest;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod screener;
pub mod synthetic;

pub use backtest::{
    evaluation_dates, run_backtest, summarize, BacktestRecord, BacktestReport, BacktestSummary,
    DatedFailure,
};
pub use config::{RunConfig, MAX_WORKERS};
pub use error::{RunError, SymbolFailure};
pub use export::{
    records_to_csv, results_to_csv, write_records_csv, write_report_json, write_results_csv,
};
pub use logging::{init_tracing, init_tracing_with};
pub use screener::{MomentumSetup, ScreenReport, Screener};
pub use synthetic::{generate_bars, SyntheticMarket};
