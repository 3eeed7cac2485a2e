//! PriceBar: the daily OHLCV unit every technical evaluator consumes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single symbol on a single day.
///
/// Sequences are ordered ascending by date with no duplicate dates. Prices are
/// split-adjusted by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Returns true if any OHLC field is NaN (void bar from alignment).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }

    /// Close-to-close fractional change from `prev`.
    pub fn change_from(&self, prev: &PriceBar) -> f64 {
        (self.close - prev.close) / prev.close
    }
}

/// Point-in-time slice: every bar dated on or before `as_of`.
///
/// Bars must be sorted ascending by date. Evaluators never see bars past the
/// evaluation date.
pub fn slice_as_of(bars: &[PriceBar], as_of: NaiveDate) -> &[PriceBar] {
    let end = bars.partition_point(|b| b.date <= as_of);
    &bars[..end]
}

/// True when the sequence is strictly ascending by date.
pub fn is_strictly_ordered(bars: &[PriceBar]) -> bool {
    bars.windows(2).all(|w| w[0].date < w[1].date)
}

/// Closing prices as a plain series.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Volumes as a plain f64 series.
pub fn volumes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.volume as f64).collect()
}
