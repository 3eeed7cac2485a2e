//! Point-in-time backtest over a fixed evaluation schedule.
//!
//! Evaluation dates run every `interval_weeks` from the start date through the
//! end date. Prices are sliced to each date before anything is computed, so no
//! score can see later bars. Fundamentals and ownership come from the provider
//! as-is and are therefore held constant across dates.

use std::collections::BTreeMap;

use canslim_core::composite::CanslimResult;
use canslim_core::data::MarketData;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::RunConfig;
use crate::error::{RunError, SymbolFailure};
use crate::screener::Screener;

/// One (date, symbol) evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRecord {
    pub date: NaiveDate,
    pub symbol: String,
    pub close: Option<f64>,
    pub rs: f64,
    pub composite: f64,
    pub c: f64,
    pub a: f64,
    pub n: f64,
    pub s: f64,
    pub l: f64,
    pub i: f64,
    pub m: f64,
    pub proximity_to_high: Option<f64>,
    pub has_fundamentals: bool,
    pub market_bullish: bool,
    pub distribution_days: usize,
    pub follow_through: bool,
    pub buy_signal: bool,
}

impl BacktestRecord {
    fn from_result(date: NaiveDate, result: &CanslimResult, min_composite: f64, min_rs: f64) -> Self {
        let s = &result.scores;
        Self {
            date,
            symbol: result.symbol.clone(),
            close: result.metrics.latest_close,
            rs: result.rs,
            composite: result.composite,
            c: s.c,
            a: s.a,
            n: s.n,
            s: s.s,
            l: s.l,
            i: s.i,
            m: s.m,
            proximity_to_high: result.metrics.proximity_to_high,
            has_fundamentals: s.has_fundamentals,
            market_bullish: result.market.is_bullish,
            distribution_days: result.market.distribution_days,
            follow_through: result.market.follow_through,
            buy_signal: result.is_buy(min_composite, min_rs),
        }
    }
}

/// Per-symbol roll-up of a backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub symbol: String,
    pub evaluations: usize,
    pub buy_signals: usize,
    pub first_buy_date: Option<NaiveDate>,
    pub first_buy_price: Option<f64>,
    pub latest_close: Option<f64>,
    /// `latest_close / first_buy_price - 1`.
    pub return_since_first_buy: Option<f64>,
}

/// A failure on one evaluation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatedFailure {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub failure: SymbolFailure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub run_id: String,
    pub dates: Vec<NaiveDate>,
    /// Ordered by date, then composite (highest first).
    pub records: Vec<BacktestRecord>,
    pub summaries: Vec<BacktestSummary>,
    pub failures: Vec<DatedFailure>,
}

impl BacktestReport {
    pub fn buy_signals(&self) -> impl Iterator<Item = &BacktestRecord> {
        self.records.iter().filter(|r| r.buy_signal)
    }

    pub fn summary(&self, symbol: &str) -> Option<&BacktestSummary> {
        self.summaries.iter().find(|s| s.symbol == symbol)
    }
}

/// Every `interval_weeks` from `start`, while on or before `end`.
pub fn evaluation_dates(start: NaiveDate, end: NaiveDate, interval_weeks: u32) -> Vec<NaiveDate> {
    let step = Duration::weeks(i64::from(interval_weeks.max(1)));
    let mut dates = Vec::new();
    let mut date = start;
    while date <= end {
        dates.push(date);
        date += step;
    }
    dates
}

/// Run the configured symbols through every evaluation date.
pub fn run_backtest<D: MarketData>(config: &RunConfig, data: &D) -> Result<BacktestReport, RunError> {
    let (Some(start), Some(end)) = (config.start, config.end) else {
        return Err(RunError::MissingDateRange);
    };
    if start > end {
        return Err(RunError::EmptyDateRange { start, end });
    }

    // setups are not part of a backtest record
    let mut screen_config = config.clone();
    screen_config.scan_pullbacks = false;
    let screener = Screener::new(screen_config)?;

    let dates = evaluation_dates(start, end, config.interval_weeks);
    info!(
        symbols = config.symbols.len(),
        dates = dates.len(),
        %start,
        %end,
        "backtest starting"
    );

    let mut records = Vec::new();
    let mut failures = Vec::new();
    for &date in &dates {
        let report = screener.screen(data, date)?;
        records.extend(
            report
                .results
                .iter()
                .map(|r| BacktestRecord::from_result(date, r, config.min_composite, config.min_rs)),
        );
        failures.extend(report.failures.into_iter().map(|failure| DatedFailure { date, failure }));
    }

    let summaries = summarize(&config.symbols, &records);
    info!(
        records = records.len(),
        buys = records.iter().filter(|r| r.buy_signal).count(),
        failures = failures.len(),
        "backtest complete"
    );

    Ok(BacktestReport {
        run_id: config.run_id(),
        dates,
        records,
        summaries,
        failures,
    })
}

/// Roll records up per symbol, in the order symbols were configured.
pub fn summarize(symbols: &[String], records: &[BacktestRecord]) -> Vec<BacktestSummary> {
    let mut by_symbol: BTreeMap<&str, Vec<&BacktestRecord>> = BTreeMap::new();
    for record in records {
        by_symbol.entry(record.symbol.as_str()).or_default().push(record);
    }

    symbols
        .iter()
        .map(|symbol| {
            let mut rows = by_symbol.remove(symbol.as_str()).unwrap_or_default();
            rows.sort_by_key(|r| r.date);
            let first_buy = rows.iter().find(|r| r.buy_signal);
            let first_buy_price = first_buy.and_then(|r| r.close);
            let latest_close = rows.last().and_then(|r| r.close);
            let return_since_first_buy = match (first_buy_price, latest_close) {
                (Some(entry), Some(last)) if entry > 0.0 => Some(last / entry - 1.0),
                _ => None,
            };
            BacktestSummary {
                symbol: symbol.clone(),
                evaluations: rows.len(),
                buy_signals: rows.iter().filter(|r| r.buy_signal).count(),
                first_buy_date: first_buy.map(|r| r.date),
                first_buy_price,
                latest_close,
                return_since_first_buy,
            }
        })
        .collect()
}
