//! Stage 2: pullback entries inside a qualifying uptrend.
//!
//! Each of the last `context` bars is checked against the `lookback` bars
//! before it. Signal types are not exclusive; a bar may carry several.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::strength::{analyze_trend, TrendStrength};
use crate::config::{PullbackConfig, TrendConfig};
use crate::domain::{closes, PriceBar};
use crate::indicators::{ema_of_series, rsi_of_series};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalType {
    /// Pulled back to the fast EMA after riding above it.
    #[serde(rename = "EMA8_RETEST")]
    Ema8Retest,
    /// Pulled back to the slow EMA after riding above it.
    #[serde(rename = "EMA21_RETEST")]
    Ema21Retest,
    /// Lost the fast EMA, held the slow one, took the fast one back.
    #[serde(rename = "EMA8_RECLAIM")]
    Ema8Reclaim,
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalType::Ema8Retest => "EMA8_RETEST",
            SignalType::Ema21Retest => "EMA21_RETEST",
            SignalType::Ema8Reclaim => "EMA8_RECLAIM",
        };
        f.write_str(name)
    }
}

/// One bar carrying at least one pullback signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSignal {
    pub date: NaiveDate,
    pub close: f64,
    pub rsi: Option<f64>,
    /// Percent distance from the fast EMA.
    pub dist_8ema: Option<f64>,
    /// Percent distance from the slow EMA.
    pub dist_21ema: Option<f64>,
    pub signal_types: Vec<SignalType>,
}

/// Both stages with one configuration pair.
#[derive(Debug, Clone, Default)]
pub struct PullbackDetector {
    trend: TrendConfig,
    pullback: PullbackConfig,
}

impl PullbackDetector {
    pub fn new(trend: TrendConfig, pullback: PullbackConfig) -> Self {
        Self { trend, pullback }
    }

    pub fn strength(&self, bars: &[PriceBar]) -> TrendStrength {
        analyze_trend(bars, &self.trend)
    }

    /// Signals oldest → newest; empty unless the trend qualifies.
    pub fn detect(&self, bars: &[PriceBar]) -> Vec<TrendSignal> {
        if !self.strength(bars).is_strong_trend {
            return Vec::new();
        }
        self.scan(bars)
    }

    /// Stage 2 alone, for callers that already qualified the trend.
    pub fn scan(&self, bars: &[PriceBar]) -> Vec<TrendSignal> {
        scan_pullbacks(bars, &self.trend, &self.pullback)
    }
}

/// Per-bar EMA state.
struct EmaState {
    above_fast: Vec<bool>,
    above_slow: Vec<bool>,
    dist_fast: Vec<f64>,
    dist_slow: Vec<f64>,
}

impl EmaState {
    fn new(closes: &[f64], trend: &TrendConfig) -> Self {
        let fast = ema_of_series(closes, trend.fast_ema);
        let slow = ema_of_series(closes, trend.slow_ema);
        let above = |ema: &[f64]| -> Vec<bool> {
            closes.iter().zip(ema).map(|(c, e)| e.is_finite() && c > e).collect()
        };
        let distance = |ema: &[f64]| -> Vec<f64> {
            closes.iter().zip(ema).map(|(c, e)| (c - e) / e * 100.0).collect()
        };
        Self {
            above_fast: above(&fast),
            above_slow: above(&slow),
            dist_fast: distance(&fast),
            dist_slow: distance(&slow),
        }
    }
}

/// Stage 2 only: scan the trailing bars without checking trend qualification.
pub fn scan_pullbacks(bars: &[PriceBar], trend: &TrendConfig, config: &PullbackConfig) -> Vec<TrendSignal> {
    let n = bars.len();
    let span = config.lookback + config.context;
    if n < span {
        return Vec::new();
    }

    let closes = closes(bars);
    let ema = EmaState::new(&closes, trend);
    let rsi = rsi_of_series(&closes, config.rsi_period);

    let mut signals = Vec::new();
    for i in (n - config.context)..n {
        let prior = (i - config.lookback)..i;
        let reclaim_window = i.saturating_sub(config.reclaim_lookback)..i;
        let mut types = Vec::new();

        let fast_share = share(&ema.above_fast[prior.clone()]);
        if ema.dist_fast[i].abs() < config.fast_tolerance_pct
            && ema.above_fast[i]
            && fast_share >= config.fast_prior_above
        {
            types.push(SignalType::Ema8Retest);
        }

        let slow_share = share(&ema.above_slow[prior]);
        if ema.dist_slow[i].abs() < config.slow_tolerance_pct
            && ema.above_slow[i]
            && slow_share >= config.slow_prior_above
        {
            types.push(SignalType::Ema21Retest);
        }

        let broke_fast = ema.above_fast[reclaim_window.clone()].iter().any(|a| !a);
        let held_slow = ema.above_slow[i] && ema.above_slow[reclaim_window].iter().all(|a| *a);
        if broke_fast && held_slow && ema.above_fast[i] {
            types.push(SignalType::Ema8Reclaim);
        }

        if !types.is_empty() {
            signals.push(TrendSignal {
                date: bars[i].date,
                close: closes[i],
                rsi: finite(rsi[i]),
                dist_8ema: finite(ema.dist_fast[i]),
                dist_21ema: finite(ema.dist_slow[i]),
                signal_types: types,
            });
        }
    }
    signals
}

fn share(flags: &[bool]) -> f64 {
    if flags.is_empty() {
        return 0.0;
    }
    flags.iter().filter(|f| **f).count() as f64 / flags.len() as f64
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
