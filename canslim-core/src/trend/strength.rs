//! Stage 1: is the symbol in a qualifying uptrend?
//!
//! Over the trailing window, price must hold above its fast or slow EMA most
//! of the time, and segment highs or lows must be stepping up.

use serde::{Deserialize, Serialize};

use crate::config::TrendConfig;
use crate::domain::{closes, PriceBar};
use crate::indicators::ema_of_series;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendStrength {
    pub is_strong_trend: bool,
    /// Mean of the two adherence figures, 0–100.
    pub trend_score: f64,
    /// Percent of window bars closing above the fast EMA.
    pub ema_8_adherence: f64,
    /// Percent of window bars closing above the slow EMA.
    pub ema_21_adherence: f64,
    pub higher_highs: bool,
    pub higher_lows: bool,
    pub strong_ema_adherence: bool,
}

/// Qualify the trailing `window` bars. Fewer bars than the window never qualify.
pub fn analyze_trend(bars: &[PriceBar], config: &TrendConfig) -> TrendStrength {
    let n = bars.len();
    if n < config.window || config.window == 0 {
        return TrendStrength::default();
    }

    let closes = closes(bars);
    let start = n - config.window;
    let ema_8_adherence = adherence(&closes[start..], &ema_of_series(&closes, config.fast_ema)[start..]);
    let ema_21_adherence = adherence(&closes[start..], &ema_of_series(&closes, config.slow_ema)[start..]);
    let strong_ema_adherence = ema_8_adherence >= config.fast_adherence * 100.0
        || ema_21_adherence >= config.slow_adherence * 100.0;

    let window = &bars[start..];
    let segments = segment_bounds(window.len(), config.segments);
    let highs: Vec<f64> = segments
        .iter()
        .map(|&(a, b)| window[a..b].iter().map(|bar| bar.high).fold(f64::NEG_INFINITY, f64::max))
        .collect();
    let lows: Vec<f64> = segments
        .iter()
        .map(|&(a, b)| window[a..b].iter().map(|bar| bar.low).fold(f64::INFINITY, f64::min))
        .collect();
    let higher_highs = has_rising_run(&highs, config.min_rising_segments);
    let higher_lows = has_rising_run(&lows, config.min_rising_segments);

    TrendStrength {
        is_strong_trend: strong_ema_adherence && (higher_highs || higher_lows),
        trend_score: (ema_8_adherence + ema_21_adherence) / 2.0,
        ema_8_adherence,
        ema_21_adherence,
        higher_highs,
        higher_lows,
        strong_ema_adherence,
    }
}

/// Percent of bars with a defined EMA that close above it.
fn adherence(closes: &[f64], ema: &[f64]) -> f64 {
    let (above, defined) = closes
        .iter()
        .zip(ema)
        .filter(|(_, e)| e.is_finite())
        .fold((0usize, 0usize), |(above, defined), (c, e)| {
            (above + usize::from(c > e), defined + 1)
        });
    if defined == 0 {
        0.0
    } else {
        above as f64 / defined as f64 * 100.0
    }
}

/// `count` contiguous `[start, end)` ranges; the last absorbs the remainder.
fn segment_bounds(len: usize, count: usize) -> Vec<(usize, usize)> {
    let size = (len / count).max(1);
    (0..count)
        .map(|k| {
            let start = (k * size).min(len);
            let end = if k + 1 == count { len } else { ((k + 1) * size).min(len) };
            (start, end)
        })
        .filter(|(a, b)| a < b)
        .collect()
}

/// True when some run of `run` consecutive values never decreases.
fn has_rising_run(values: &[f64], run: usize) -> bool {
    run >= 2 && values.len() >= run && values.windows(run).any(|w| w.windows(2).all(|p| p[0] <= p[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn config() -> TrendConfig {
        TrendConfig::default()
    }

    #[test]
    fn monotonic_rise_is_strong() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let t = analyze_trend(&make_bars(&closes), &config());
        assert!(t.is_strong_trend);
        assert_eq!(t.ema_8_adherence, 100.0);
        assert_eq!(t.ema_21_adherence, 100.0);
        assert_eq!(t.trend_score, 100.0);
        assert!(t.higher_highs && t.higher_lows);
    }

    #[test]
    fn monotonic_decline_is_not() {
        let closes: Vec<f64> = (0..80).map(|i| 200.0 - i as f64).collect();
        let t = analyze_trend(&make_bars(&closes), &config());
        assert!(!t.is_strong_trend);
        assert_eq!(t.ema_8_adherence, 0.0);
        assert!(!t.higher_highs && !t.higher_lows);
    }

    #[test]
    fn short_history_never_qualifies() {
        let closes: Vec<f64> = (0..59).map(|i| 100.0 + i as f64).collect();
        assert_eq!(analyze_trend(&make_bars(&closes), &config()), TrendStrength::default());
    }

    #[test]
    fn segments_cover_window() {
        assert_eq!(segment_bounds(60, 4), vec![(0, 15), (15, 30), (30, 45), (45, 60)]);
        assert_eq!(segment_bounds(62, 4), vec![(0, 15), (15, 30), (30, 45), (45, 62)]);
        assert_eq!(segment_bounds(2, 4), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn rising_run_detection() {
        assert!(has_rising_run(&[1.0, 2.0, 2.0, 0.5], 3));
        assert!(has_rising_run(&[3.0, 1.0, 2.0, 4.0], 3));
        assert!(!has_rising_run(&[3.0, 1.0, 4.0, 2.0], 3));
        assert!(!has_rising_run(&[1.0, 2.0], 3));
    }

    #[test]
    fn adherence_skips_warmup() {
        let ema = [f64::NAN, f64::NAN, 1.0, 5.0];
        assert_eq!(adherence(&[9.0, 9.0, 2.0, 4.0], &ema), 50.0);
        assert_eq!(adherence(&[1.0], &[f64::NAN]), 0.0);
    }
}
