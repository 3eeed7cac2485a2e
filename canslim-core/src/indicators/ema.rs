//! Exponential moving averages.
//!
//! Two flavours are needed:
//! - [`Ema`] / [`ema_of_series`]: recursive, seeded with the SMA of the first
//!   `period` values, NaN during warm-up. Used for the 8/21 trend EMAs.
//! - [`ewm_mean`]: bias-corrected exponentially weighted mean defined from the
//!   first bar (weights `(1-alpha)^k` normalised by their sum). Used for the
//!   21/50/200 benchmark EMAs, where a 200-bar warm-up would blank out most of
//!   a one-year history.

use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.period)
    }
}

/// SMA-seeded recursive EMA of an arbitrary series.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period || period == 0 {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);

    // Seed: SMA of first `period` values
    let mut sum = 0.0;
    for &v in values.iter().take(period) {
        if v.is_nan() {
            return result;
        }
        sum += v;
    }
    let seed = sum / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        if values[i].is_nan() {
            for val in result.iter_mut().skip(i) {
                *val = f64::NAN;
            }
            return result;
        }
        let ema = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ema;
        prev = ema;
    }

    result
}

/// Bias-corrected exponentially weighted mean with `alpha = 2 / (span + 1)`.
///
/// `y[t] = sum_k (1-alpha)^k x[t-k] / sum_k (1-alpha)^k`, computed recursively.
/// Defined from the first value; a NaN input taints everything after it.
pub fn ewm_mean(values: &[f64], span: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if span == 0 {
        return result;
    }

    let decay = 1.0 - 2.0 / (span as f64 + 1.0);
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            return result;
        }
        numerator = v + decay * numerator;
        denominator = 1.0 + decay * denominator;
        result[i] = numerator / denominator;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_equals_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = Ema::new(1).compute(&bars);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // alpha = 0.5, seed at index 2 = SMA(10,11,12) = 11
        // EMA[3] = 0.5*13 + 0.5*11 = 12, EMA[4] = 0.5*14 + 0.5*12 = 13
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Ema::new(3).compute(&bars);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
        assert_approx(result[4], 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_nan_in_seed_produces_all_nan() {
        let mut bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        bars[1].close = f64::NAN;
        let result = Ema::new(3).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn ema_lookback() {
        assert_eq!(Ema::new(21).lookback(), 20);
        assert_eq!(Ema::new(1).lookback(), 0);
    }

    #[test]
    fn ewm_first_value_is_input() {
        let out = ewm_mean(&[50.0, 60.0], 21);
        assert_approx(out[0], 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ewm_known_values_span_3() {
        // decay = 0.5: y1 = (2 + 0.5*1) / 1.5 = 5/3
        // y2 = (3 + 0.5*2 + 0.25*1) / 1.75 = 4.25/1.75
        let out = ewm_mean(&[1.0, 2.0, 3.0], 3);
        assert_approx(out[1], 5.0 / 3.0, 1e-12);
        assert_approx(out[2], 4.25 / 1.75, 1e-12);
    }

    #[test]
    fn ewm_constant_series_is_constant() {
        let out = ewm_mean(&[7.0; 40], 200);
        assert!(out.iter().all(|v| (v - 7.0).abs() < 1e-12));
    }

    #[test]
    fn ewm_lags_a_rising_series() {
        let values: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        let fast = ewm_mean(&values, 21);
        let slow = ewm_mean(&values, 50);
        assert!(values[99] > fast[99]);
        assert!(fast[99] > slow[99]);
    }
}
