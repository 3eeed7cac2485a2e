//! Market regime classifier (component M).
//!
//! Turns benchmark OHLCV into a regime verdict from three signals:
//! distribution-day pressure, a follow-through day confirming a rally attempt,
//! and the alignment of the 21/50/200 EMAs. Only bars on or before the
//! evaluation date are ever read.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::MarketConfig;
use crate::domain::{closes, slice_as_of, PriceBar, Symbol};
use crate::indicators::ewm_mean;

/// Regime verdict for one benchmark on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTrend {
    pub benchmark: Symbol,
    pub as_of: Option<NaiveDate>,
    /// Blended score in [0, 1].
    pub score: f64,
    pub is_bullish: bool,
    pub latest_close: Option<f64>,
    pub distribution_days: usize,
    pub distribution_score: f64,
    pub follow_through: bool,
    pub trend_score: f64,
    pub ema_21: Option<f64>,
    pub ema_50: Option<f64>,
    pub ema_200: Option<f64>,
}

impl MarketTrend {
    /// Fixed neutral-bearish verdict used when history is too short.
    pub fn neutral(benchmark: &str, bars: &[PriceBar], config: &MarketConfig) -> Self {
        Self {
            benchmark: benchmark.to_string(),
            as_of: bars.last().map(|b| b.date),
            score: config.neutral_score,
            is_bullish: false,
            latest_close: bars.last().map(|b| b.close),
            distribution_days: 0,
            distribution_score: 0.0,
            follow_through: false,
            trend_score: 0.0,
            ema_21: None,
            ema_50: None,
            ema_200: None,
        }
    }
}

/// Classify the regime from the full slice handed in.
pub fn classify(benchmark: &str, bars: &[PriceBar], config: &MarketConfig) -> MarketTrend {
    let n = bars.len();
    if n < config.min_bars {
        return MarketTrend::neutral(benchmark, bars, config);
    }

    let closes = closes(bars);
    let ema_fast = ewm_mean(&closes, config.ema_fast);
    let ema_mid = ewm_mean(&closes, config.ema_mid);
    let ema_slow = ewm_mean(&closes, config.ema_slow);

    let distribution_days = count_distribution_days(bars, config);
    let distribution_score =
        (1.0 - distribution_days as f64 / config.max_distribution_days as f64).max(0.0);
    let follow_through = detect_follow_through(bars, config);

    let close = closes[n - 1];
    let (fast, mid, slow) = (ema_fast[n - 1], ema_mid[n - 1], ema_slow[n - 1]);

    let mut trend_score = 0.0;
    if close > slow {
        trend_score += config.price_above_slow_weight;
    }
    if fast > mid && mid > slow {
        trend_score += config.ema_alignment_weight;
    }
    if n > config.mid_rising_lookback && mid > ema_mid[n - config.mid_rising_lookback] {
        trend_score += config.mid_rising_weight;
    }
    if close > fast {
        trend_score += config.price_above_fast_weight;
    }

    let follow_through_score = if follow_through { 1.0 } else { 0.0 };
    let score = (config.distribution_weight * distribution_score
        + config.follow_through_weight * follow_through_score
        + config.trend_weight() * trend_score)
        .clamp(0.0, 1.0);

    MarketTrend {
        benchmark: benchmark.to_string(),
        as_of: Some(bars[n - 1].date),
        score,
        is_bullish: score >= config.bullish_threshold,
        latest_close: Some(close),
        distribution_days,
        distribution_score,
        follow_through,
        trend_score,
        ema_21: finite(fast),
        ema_50: finite(mid),
        ema_200: finite(slow),
    }
}

/// Classify using only bars dated on or before `as_of`.
pub fn classify_as_of(
    benchmark: &str,
    bars: &[PriceBar],
    as_of: NaiveDate,
    config: &MarketConfig,
) -> MarketTrend {
    classify(benchmark, slice_as_of(bars, as_of), config)
}

/// Down days of at least `distribution_min_decline` on volume above the prior day.
pub fn count_distribution_days(bars: &[PriceBar], config: &MarketConfig) -> usize {
    let n = bars.len();
    if n < 2 {
        return 0;
    }
    let lookback = config.distribution_lookback.min(n - 1);
    bars[n - lookback - 1..]
        .windows(2)
        .filter(|w| {
            w[1].change_from(&w[0]) <= -config.distribution_min_decline && w[1].volume > w[0].volume
        })
        .count()
}

/// Rally-attempt scan over the trailing window.
///
/// The first up day starts a rally; each further up day extends it. A day at
/// or past `follow_through_min_day` gaining `follow_through_min_gain` on higher
/// volume confirms. A decline deeper than `rally_reset_decline` resets.
pub fn detect_follow_through(bars: &[PriceBar], config: &MarketConfig) -> bool {
    let n = bars.len();
    if n < config.follow_through_window {
        return false;
    }

    let mut rally_day = 0usize;
    for w in bars[n - config.follow_through_window..].windows(2) {
        let change = w[1].change_from(&w[0]);
        if change > 0.0 {
            rally_day += 1;
            if rally_day >= config.follow_through_min_day
                && change >= config.follow_through_min_gain
                && w[1].volume > w[0].volume
            {
                return true;
            }
        } else if change < -config.rally_reset_decline {
            rally_day = 0;
        }
    }
    false
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, make_bars_with_volume};

    fn config() -> MarketConfig {
        MarketConfig::default()
    }

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 0.5).collect()
    }

    #[test]
    fn short_history_is_neutral() {
        let bars = make_bars(&rising(49));
        let m = classify("SPY", &bars, &config());
        assert_eq!(m.score, 0.4);
        assert!(!m.is_bullish);
        assert!(m.ema_21.is_none() && m.ema_50.is_none() && m.ema_200.is_none());
        assert_eq!(m.distribution_days, 0);
        assert!(!m.follow_through);
    }

    #[test]
    fn clean_uptrend_is_bullish() {
        let bars = make_bars(&rising(300));
        let m = classify("SPY", &bars, &config());
        assert_eq!(m.distribution_days, 0);
        assert!(!m.follow_through);
        assert_approx(m.trend_score, 1.0, 1e-9);
        assert_approx(m.score, 0.85, 1e-9);
        assert!(m.is_bullish);
        assert!(m.ema_21.unwrap() > m.ema_50.unwrap());
    }

    #[test]
    fn six_distribution_days_zero_the_distribution_score() {
        let mut closes = rising(60);
        let mut volumes = vec![1_000u64; 60];
        for k in 0..6 {
            let i = 54 + k;
            closes[i] = closes[i - 1] * 0.995;
            volumes[i] = volumes[i - 1] + 100;
        }
        let bars = make_bars_with_volume(&closes, &volumes);
        let m = classify("SPY", &bars, &config());
        assert_eq!(m.distribution_days, 6);
        assert_eq!(m.distribution_score, 0.0);
    }

    #[test]
    fn declines_on_lower_volume_are_not_distribution() {
        let mut closes = rising(60);
        let mut volumes = vec![1_000u64; 60];
        for k in 0..3 {
            let i = 55 + k;
            closes[i] = closes[i - 1] * 0.99;
            volumes[i] = volumes[i - 1] - 100;
        }
        let bars = make_bars_with_volume(&closes, &volumes);
        assert_eq!(count_distribution_days(&bars, &config()), 0);
    }

    #[test]
    fn follow_through_on_fourth_rally_day() {
        let mut closes = vec![100.0; 60];
        let mut volumes = vec![1_000u64; 60];
        // three small up days, then a 2% gain on higher volume
        for (k, gain) in [0.003, 0.003, 0.003, 0.02].iter().enumerate() {
            let i = 52 + k;
            closes[i] = closes[i - 1] * (1.0 + gain);
            volumes[i] = 1_000 + 100 * (k as u64 + 1);
        }
        for i in 56..60 {
            closes[i] = closes[55];
        }
        let bars = make_bars_with_volume(&closes, &volumes);
        assert!(detect_follow_through(&bars, &config()));
        assert!(classify("SPY", &bars, &config()).follow_through);
    }

    #[test]
    fn sharp_decline_resets_rally() {
        let mut closes = vec![100.0; 60];
        let mut volumes = vec![1_000u64; 60];
        let moves = [0.003, 0.003, 0.003, -0.02, 0.02];
        for (k, m) in moves.iter().enumerate() {
            let i = 50 + k;
            closes[i] = closes[i - 1] * (1.0 + m);
            volumes[i] = 1_000 + 100 * (k as u64 + 1);
        }
        for i in 55..60 {
            closes[i] = closes[54];
        }
        let bars = make_bars_with_volume(&closes, &volumes);
        assert!(!detect_follow_through(&bars, &config()));
    }

    #[test]
    fn fourth_day_gain_too_small() {
        let mut closes = vec![100.0; 60];
        let mut volumes = vec![1_000u64; 60];
        for (k, gain) in [0.003, 0.003, 0.003, 0.01].iter().enumerate() {
            let i = 52 + k;
            closes[i] = closes[i - 1] * (1.0 + gain);
            volumes[i] = 1_000 + 100 * (k as u64 + 1);
        }
        for i in 56..60 {
            closes[i] = closes[55];
        }
        let bars = make_bars_with_volume(&closes, &volumes);
        assert!(!detect_follow_through(&bars, &config()));
    }

    #[test]
    fn downtrend_is_bearish() {
        let closes: Vec<f64> = (0..250).map(|i| 300.0 - i as f64 * 0.5).collect();
        let m = classify("SPY", &make_bars(&closes), &config());
        assert_eq!(m.trend_score, 0.0);
        assert!(!m.is_bullish);
    }

    #[test]
    fn as_of_ignores_later_bars() {
        let bars = make_bars(&rising(120));
        let cutoff = bars[79].date;
        let sliced = classify("SPY", &bars[..80], &config());
        let as_of = classify_as_of("SPY", &bars, cutoff, &config());
        assert_eq!(sliced, as_of);
        assert_eq!(as_of.as_of, Some(cutoff));
    }
}
