//! Component evaluators C, A, N, S, I, L.
//!
//! Each evaluator is a pure function returning a [`ComponentEval`]: a score in
//! [0, 1] plus the raw metric behind it. Missing or unusable input never
//! errors; it resolves to the evaluator's documented default score with
//! [`Measured::Unavailable`] as the raw metric.

pub mod annual;
pub mod current;
pub mod institutional;
pub mod leadership;
pub mod new_highs;
pub mod supply;

pub use annual::{evaluate_a, AnnualEarnings};
pub use current::{evaluate_c, CurrentEarnings, GrowthMethod};
pub use institutional::{evaluate_i, ownership_curve, Sponsorship};
pub use leadership::evaluate_l;
pub use new_highs::{evaluate_n, proximity_curve, NewHighs};
pub use supply::{evaluate_s, SupplyDemand};

use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;

/// A raw metric that was either measured or could not be.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measured<T> {
    Scored(T),
    Unavailable,
}

impl<T> Measured<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Measured::Scored(_))
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Measured::Scored(v) => Some(v),
            Measured::Unavailable => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Measured::Scored(v) => Some(v),
            Measured::Unavailable => None,
        }
    }
}

impl<T> From<Option<T>> for Measured<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Measured::Unavailable, Measured::Scored)
    }
}

/// Score in [0, 1] and the raw metric it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentEval<M> {
    pub score: f64,
    pub raw: Measured<M>,
}

impl<M> ComponentEval<M> {
    pub fn scored(score: f64, raw: M) -> Self {
        Self {
            score: clip01(score),
            raw: Measured::Scored(raw),
        }
    }

    pub fn unavailable(default_score: f64) -> Self {
        Self {
            score: default_score,
            raw: Measured::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        self.raw.is_available()
    }
}

/// Latest close relative to recent highs, plus the 50-day average volume.
///
/// Computed once per (symbol, date) and shared by N, S and the result record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceContext {
    pub latest_close: f64,
    /// Highest close over the high lookback.
    pub high_52w: f64,
    /// `latest_close / high_52w`.
    pub proximity: f64,
    pub avg_volume_50: f64,
}

impl PriceContext {
    pub fn from_bars(bars: &[PriceBar], high_lookback: usize, volume_window: usize) -> Option<Self> {
        let last = bars.last()?;
        let high_52w = tail(bars, high_lookback)
            .iter()
            .map(|b| b.close)
            .filter(|c| c.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);
        if !(high_52w > 0.0) || !last.close.is_finite() {
            return None;
        }
        Some(Self {
            latest_close: last.close,
            high_52w,
            proximity: last.close / high_52w,
            avg_volume_50: mean_volume(tail(bars, volume_window)),
        })
    }
}

/// Fractional growth from `previous` to `current`, relative to |previous|.
///
/// `None` when either side is missing or the base is (near) zero.
pub fn growth_rate(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    let (current, previous) = (current?, previous?);
    if !current.is_finite() || !previous.is_finite() || previous.abs() < 1e-8 {
        return None;
    }
    Some((current - previous) / previous.abs())
}

/// Growth against a target: `clip(g / target, 0, 2) / 2`, so hitting the target scores 0.5.
pub fn growth_score(growth: f64, target: f64) -> f64 {
    (growth / target).clamp(0.0, 2.0) / 2.0
}

/// Fraction of `growths` at or above `target`; 0 for an empty slice.
pub fn consistency(growths: &[f64], target: f64) -> f64 {
    if growths.is_empty() {
        return 0.0;
    }
    growths.iter().filter(|g| **g >= target).count() as f64 / growths.len() as f64
}

pub fn clip01(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

pub(crate) fn tail<T>(items: &[T], len: usize) -> &[T] {
    &items[items.len().saturating_sub(len)..]
}

pub(crate) fn mean_volume(bars: &[PriceBar]) -> f64 {
    if bars.is_empty() {
        return 0.0;
    }
    bars.iter().map(|b| b.volume as f64).sum::<f64>() / bars.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars_with_volume};

    #[test]
    fn growth_rate_uses_absolute_base() {
        assert_approx(growth_rate(Some(1.5), Some(1.0)).unwrap(), 0.5, 1e-12);
        // loss narrowing from -2 to -1 is positive growth
        assert_approx(growth_rate(Some(-1.0), Some(-2.0)).unwrap(), 0.5, 1e-12);
        assert!(growth_rate(Some(1.0), Some(0.0)).is_none());
        assert!(growth_rate(None, Some(1.0)).is_none());
        assert!(growth_rate(Some(f64::NAN), Some(1.0)).is_none());
    }

    #[test]
    fn growth_score_saturates() {
        assert_eq!(growth_score(0.25, 0.25), 0.5);
        assert_eq!(growth_score(1.0, 0.25), 1.0);
        assert_eq!(growth_score(-0.3, 0.25), 0.0);
    }

    #[test]
    fn measured_from_option() {
        assert_eq!(Measured::from(Some(3)), Measured::Scored(3));
        assert_eq!(Measured::<i32>::from(None), Measured::Unavailable);
        assert_eq!(Measured::Scored(2).into_option(), Some(2));
    }

    #[test]
    fn scored_eval_is_clipped() {
        assert_eq!(ComponentEval::scored(1.4, ()).score, 1.0);
        assert_eq!(ComponentEval::scored(f64::NAN, ()).score, 0.0);
    }

    #[test]
    fn price_context_tracks_window_high() {
        let closes = [50.0, 120.0, 90.0, 100.0, 95.0];
        let bars = make_bars_with_volume(&closes, &[10, 20, 30, 40, 50]);
        let ctx = PriceContext::from_bars(&bars, 3, 2).unwrap();
        assert_eq!(ctx.high_52w, 100.0);
        assert_eq!(ctx.proximity, 0.95);
        assert_eq!(ctx.avg_volume_50, 45.0);
        assert!(PriceContext::from_bars(&[], 3, 2).is_none());
    }
}
