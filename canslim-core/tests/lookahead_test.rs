//! Look-ahead contamination tests.
//!
//! Invariant: nothing computed for date t may depend on bars dated after t.
//!
//! Method: compute on a truncated series and on the full series sliced to the
//! same date. Any difference means future data leaked into the past.

use canslim_core::config::{MarketConfig, PullbackConfig, TrendConfig};
use canslim_core::domain::{slice_as_of, PriceBar};
use canslim_core::indicators::{Ema, Indicator, Rsi};
use canslim_core::market::{classify, classify_as_of};
use canslim_core::trend::{analyze_trend, scan_pullbacks};
use chrono::NaiveDate;

/// N bars of deterministic pseudo-random walk with volume variation.
fn make_test_bars(n: usize) -> Vec<PriceBar> {
    let base_date = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let change = ((seed >> 33) % 200) as f64 / 100.0 - 0.97; // slight upward drift
        price = (price + change).max(10.0);

        let open = price - 0.4;
        let close = price;
        bars.push(PriceBar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high: open.max(close) + 1.5,
            low: open.min(close) - 1.5,
            close,
            volume: 1_000_000 + (seed >> 40) % 500_000,
        });
    }
    bars
}

fn same(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

fn assert_prefix_stable(indicator: &dyn Indicator, bars: &[PriceBar], truncated_len: usize) {
    let full = indicator.compute(bars);
    let truncated = indicator.compute(&bars[..truncated_len]);
    assert_eq!(truncated.len(), truncated_len, "{}: length mismatch", indicator.name());
    for i in 0..truncated_len {
        assert!(
            same(full[i], truncated[i]),
            "{}: bar {i} differs: full={} truncated={}",
            indicator.name(),
            full[i],
            truncated[i]
        );
    }
}

#[test]
fn ema_has_no_lookahead() {
    let bars = make_test_bars(300);
    for period in [8, 21, 50] {
        assert_prefix_stable(&Ema::new(period), &bars, 150);
    }
}

#[test]
fn rsi_has_no_lookahead() {
    let bars = make_test_bars(300);
    assert_prefix_stable(&Rsi::new(14), &bars, 150);
}

#[test]
fn market_classifier_reads_only_past_bars() {
    let bars = make_test_bars(400);
    let config = MarketConfig::default();
    for cut in [49, 50, 120, 250, 399] {
        let date = bars[cut].date;
        let sliced = classify_as_of("SPY", &bars, date, &config);
        let truncated = classify("SPY", &bars[..=cut], &config);
        assert_eq!(sliced, truncated, "cut at bar {cut}");
        assert_eq!(sliced.as_of, Some(date));
    }
}

#[test]
fn trend_detection_reads_only_past_bars() {
    let bars = make_test_bars(300);
    let trend = TrendConfig::default();
    let pullback = PullbackConfig::default();
    let date = bars[200].date;
    let sliced = slice_as_of(&bars, date);
    assert_eq!(sliced.len(), 201);
    assert_eq!(analyze_trend(sliced, &trend), analyze_trend(&bars[..201], &trend));
    let signals = scan_pullbacks(sliced, &trend, &pullback);
    assert!(signals.iter().all(|s| s.date <= date));
}
