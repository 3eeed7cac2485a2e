//! Screening driver: score a symbol list on one date.
//!
//! Per date the market regime is classified once and the RS snapshot is
//! computed once (through the ranker's cache). Symbols are then scored on a
//! bounded worker pool. A symbol that fails is recorded and skipped; it never
//! aborts the batch.

use std::sync::Arc;

use canslim_core::composite::{evaluate_canslim, CanslimResult, SymbolInputs};
use canslim_core::data::{resolve_universe, MarketData};
use canslim_core::domain::{closes, PriceBar};
use canslim_core::indicators::rsi_of_series;
use canslim_core::market::{classify, MarketTrend};
use canslim_core::ranking::{RsRanker, RsSnapshot};
use canslim_core::trend::{PullbackDetector, TrendSignal, TrendStrength};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::error::{RunError, SymbolFailure};

/// A leader in a qualifying uptrend, with any pullback entries found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumSetup {
    pub symbol: String,
    pub rs: f64,
    pub strength: TrendStrength,
    pub latest_close: f64,
    pub latest_rsi: Option<f64>,
    /// Oldest first.
    pub signals: Vec<TrendSignal>,
}

/// Outcome of one screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenReport {
    pub as_of: NaiveDate,
    pub market: MarketTrend,
    /// Sorted by composite, highest first.
    pub results: Vec<CanslimResult>,
    pub setups: Vec<MomentumSetup>,
    pub failures: Vec<SymbolFailure>,
}

impl ScreenReport {
    /// Results clearing both buy thresholds, in composite order.
    pub fn buy_signals(&self, min_composite: f64, min_rs: f64) -> Vec<&CanslimResult> {
        self.results
            .iter()
            .filter(|r| r.is_buy(min_composite, min_rs))
            .collect()
    }

    pub fn result(&self, symbol: &str) -> Option<&CanslimResult> {
        self.results.iter().find(|r| r.symbol == symbol)
    }
}

type SymbolOutcome = Result<(CanslimResult, Option<MomentumSetup>), RunError>;

/// Reusable screening driver. The RS cache lives as long as the screener.
pub struct Screener {
    config: RunConfig,
    ranker: RsRanker,
    detector: PullbackDetector,
    pool: Option<rayon::ThreadPool>,
}

impl Screener {
    pub fn new(config: RunConfig) -> Result<Self, RunError> {
        config.validate()?;
        let pool = if config.workers > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.workers)
                    .thread_name(|i| format!("canslim-worker-{i}"))
                    .build()?,
            )
        } else {
            None
        };
        let ranker = RsRanker::new(config.engine.rs.clone());
        let detector = PullbackDetector::new(config.engine.trend.clone(), config.engine.pullback.clone());
        Ok(Self {
            config,
            ranker,
            detector,
            pool,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn ranker(&self) -> &RsRanker {
        &self.ranker
    }

    /// Screen the configured symbols on `as_of`.
    pub fn screen<D: MarketData>(&self, data: &D, as_of: NaiveDate) -> Result<ScreenReport, RunError> {
        self.screen_symbols(data, &self.config.symbols, as_of)
    }

    /// Screen an explicit symbol list on `as_of`.
    pub fn screen_symbols<D: MarketData>(
        &self,
        data: &D,
        symbols: &[String],
        as_of: NaiveDate,
    ) -> Result<ScreenReport, RunError> {
        if symbols.is_empty() {
            return Err(RunError::NoSymbols);
        }

        let market = self.market(data, as_of);
        let universe = resolve_universe(data, Some(as_of), symbols);
        let snapshot = self.ranker.snapshot(data, &universe, as_of);

        let evaluate = |symbol: &String| {
            let outcome = self.evaluate_symbol(data, symbol, as_of, &market, &snapshot);
            (symbol.clone(), outcome)
        };
        let outcomes: Vec<(String, SymbolOutcome)> = match &self.pool {
            Some(pool) => pool.install(|| symbols.par_iter().map(evaluate).collect()),
            None => symbols.iter().map(evaluate).collect(),
        };

        let mut results = Vec::with_capacity(outcomes.len());
        let mut setups = Vec::new();
        let mut failures = Vec::new();
        for (symbol, outcome) in outcomes {
            match outcome {
                Ok((result, setup)) => {
                    results.push(result);
                    setups.extend(setup);
                }
                Err(e) => {
                    warn!(%symbol, %as_of, error = %e, "symbol skipped");
                    failures.push(SymbolFailure::new(symbol, &e));
                }
            }
        }
        results.sort_by(|a, b| b.composite.total_cmp(&a.composite).then_with(|| a.symbol.cmp(&b.symbol)));
        setups.sort_by(|a, b| b.rs.total_cmp(&a.rs).then_with(|| a.symbol.cmp(&b.symbol)));

        info!(
            %as_of,
            scored = results.len(),
            failed = failures.len(),
            setups = setups.len(),
            bullish = market.is_bullish,
            "screen complete"
        );

        Ok(ScreenReport {
            as_of,
            market,
            results,
            setups,
            failures,
        })
    }

    /// Benchmark regime on `as_of`; a missing benchmark yields the neutral verdict.
    fn market<D: MarketData>(&self, data: &D, as_of: NaiveDate) -> MarketTrend {
        let benchmark = &self.config.benchmark;
        match data.bars(benchmark, Some(as_of)) {
            Ok(bars) => classify(benchmark, &bars, &self.config.engine.market),
            Err(e) => {
                warn!(%benchmark, error = %e, "benchmark unavailable, using neutral regime");
                MarketTrend::neutral(benchmark, &[], &self.config.engine.market)
            }
        }
    }

    fn evaluate_symbol<D: MarketData>(
        &self,
        data: &D,
        symbol: &str,
        as_of: NaiveDate,
        market: &MarketTrend,
        snapshot: &Arc<RsSnapshot>,
    ) -> SymbolOutcome {
        let bars = data.bars(symbol, Some(as_of))?;
        let fundamentals = data.fundamentals(symbol).unwrap_or_else(|e| {
            debug!(%symbol, error = %e, "no fundamentals, scoring technicals only");
            Default::default()
        });
        let ownership = data.ownership(symbol).unwrap_or_else(|e| {
            debug!(%symbol, error = %e, "no ownership data");
            Default::default()
        });
        let rs = snapshot.score(symbol);

        let inputs = SymbolInputs {
            symbol,
            bars: &bars,
            fundamentals: &fundamentals,
            ownership: &ownership,
            rs,
        };
        let result = evaluate_canslim(inputs, market, &self.config.engine)?;

        let setup = if self.config.scan_pullbacks && rs >= self.config.min_rs {
            self.momentum_setup(symbol, rs, &bars)
        } else {
            None
        };
        Ok((result, setup))
    }

    fn momentum_setup(&self, symbol: &str, rs: f64, bars: &[PriceBar]) -> Option<MomentumSetup> {
        let strength = self.detector.strength(bars);
        if !strength.is_strong_trend {
            return None;
        }
        let closes = closes(bars);
        let latest_close = *closes.last()?;
        let latest_rsi = rsi_of_series(&closes, self.config.engine.pullback.rsi_period)
            .last()
            .copied()
            .filter(|v| v.is_finite());
        Some(MomentumSetup {
            symbol: symbol.to_string(),
            rs,
            strength,
            latest_close,
            latest_rsi,
            signals: self.detector.scan(bars),
        })
    }
}
