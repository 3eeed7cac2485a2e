//! Composite scorer.
//!
//! Blends the seven component scores into a 0–100 composite. When neither
//! current nor annual earnings growth could be computed, C and A are dropped
//! and the remaining weights renormalised, so missing fundamentals are not
//! scored as zeros.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::components::{
    evaluate_a, evaluate_c, evaluate_i, evaluate_l, evaluate_n, evaluate_s, PriceContext,
};
use crate::config::{CompositeWeights, EngineConfig};
use crate::data::ProviderError;
use crate::domain::{Fundamentals, OwnershipHistory, PriceBar, Symbol};
use crate::market::MarketTrend;

/// Fewest bars a symbol needs to be evaluated at all.
pub const MIN_EVALUATION_BARS: usize = 30;

/// Component scores in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub c: f64,
    pub a: f64,
    pub n: f64,
    pub s: f64,
    pub l: f64,
    pub i: f64,
    pub m: f64,
    /// True when C or A produced a growth figure.
    pub has_fundamentals: bool,
}

/// Weighted composite in [0, 100].
pub fn composite_score(scores: &ComponentScores, weights: &CompositeWeights) -> f64 {
    let w = if scores.has_fundamentals {
        *weights
    } else {
        weights.degraded()
    };
    let blended = w.c * scores.c
        + w.a * scores.a
        + w.n * scores.n
        + w.s * scores.s
        + w.l * scores.l
        + w.i * scores.i
        + w.m * scores.m;
    (blended * 100.0).clamp(0.0, 100.0)
}

/// Raw figures behind the component scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetrics {
    pub current_growth: Option<f64>,
    pub annual_growth: Option<f64>,
    pub roe: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub latest_close: Option<f64>,
    pub high_52w: Option<f64>,
    pub proximity_to_high: Option<f64>,
    pub avg_volume_50: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub up_down_ratio: Option<f64>,
    pub volume_surge: Option<f64>,
    pub power_gap: Option<bool>,
    pub institutional_ownership: Option<f64>,
    pub holder_change: Option<f64>,
    /// RS percentile behind L; `None` when the symbol was not ranked.
    pub rs_percentile: Option<f64>,
}

/// Score of one symbol on one date. Recreated per evaluation, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanslimResult {
    pub symbol: Symbol,
    pub as_of: NaiveDate,
    pub scores: ComponentScores,
    pub composite: f64,
    pub rs: f64,
    pub metrics: RawMetrics,
    pub market: MarketTrend,
}

impl CanslimResult {
    pub fn is_buy(&self, min_composite: f64, min_rs: f64) -> bool {
        self.composite >= min_composite && self.rs >= min_rs
    }

    pub fn has_fundamentals(&self) -> bool {
        self.scores.has_fundamentals
    }
}

/// Everything known about one symbol at one evaluation date.
///
/// `bars` must already be sliced to the evaluation date.
#[derive(Debug, Clone, Copy)]
pub struct SymbolInputs<'a> {
    pub symbol: &'a str,
    pub bars: &'a [PriceBar],
    pub fundamentals: &'a Fundamentals,
    pub ownership: &'a OwnershipHistory,
    /// RS score from the universe snapshot; 0 when unranked.
    pub rs: f64,
}

/// Run every component evaluator and blend the result.
pub fn evaluate_canslim(
    inputs: SymbolInputs<'_>,
    market: &MarketTrend,
    config: &EngineConfig,
) -> Result<CanslimResult, ProviderError> {
    let bars = inputs.bars;
    let Some(last) = bars.last().filter(|_| bars.len() >= MIN_EVALUATION_BARS) else {
        return Err(ProviderError::InsufficientHistory {
            symbol: inputs.symbol.to_string(),
            have: bars.len(),
            need: MIN_EVALUATION_BARS,
        });
    };

    let f = inputs.fundamentals;
    let price = PriceContext::from_bars(
        bars,
        config.new_highs.high_lookback,
        config.supply.average_volume_window,
    );

    let c = evaluate_c(&f.quarterly, &config.current);
    let a = evaluate_a(&f.annual, &f.balance_sheet, &config.annual);
    let n = evaluate_n(&f.quarterly, price.as_ref(), &config.new_highs);
    let s = evaluate_s(bars, f.shares_outstanding, price.as_ref(), &config.supply);
    let i = evaluate_i(inputs.ownership, &config.institutional);
    let l = evaluate_l((inputs.rs > 0.0).then_some(inputs.rs));

    let scores = ComponentScores {
        c: c.score,
        a: a.score,
        n: n.score,
        s: s.score,
        l: l.score,
        i: i.score,
        m: market.score,
        has_fundamentals: c.is_available() || a.is_available(),
    };
    let composite = composite_score(&scores, &config.composite);

    let annual = a.raw.as_option();
    let new_highs = n.raw.as_option();
    let supply = s.raw.as_option();
    let sponsorship = i.raw.as_option();
    let metrics = RawMetrics {
        current_growth: c.raw.as_option().map(|r| r.growth),
        annual_growth: annual.map(|r| r.growth),
        roe: annual.and_then(|r| r.roe),
        revenue_growth: new_highs.and_then(|r| r.revenue_growth),
        latest_close: price.map(|p| p.latest_close),
        high_52w: price.map(|p| p.high_52w),
        proximity_to_high: price.map(|p| p.proximity),
        avg_volume_50: price.map(|p| p.avg_volume_50),
        shares_outstanding: supply.and_then(|r| r.shares_outstanding),
        up_down_ratio: supply.and_then(|r| r.up_down_ratio),
        volume_surge: supply.and_then(|r| r.volume_surge),
        power_gap: supply.map(|r| r.power_gap),
        institutional_ownership: sponsorship.map(|r| r.held_percent),
        holder_change: sponsorship.and_then(|r| r.holder_change),
        rs_percentile: l.raw.into_option(),
    };

    Ok(CanslimResult {
        symbol: inputs.symbol.to_string(),
        as_of: last.date,
        scores,
        composite,
        rs: inputs.rs,
        metrics,
        market: market.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MarketConfig, WEIGHT_TOLERANCE};
    use crate::domain::{FundamentalSnapshot, OwnershipSnapshot, PeriodType};
    use crate::indicators::{assert_approx, make_bars};

    fn scores(v: f64, has_fundamentals: bool) -> ComponentScores {
        ComponentScores {
            c: v,
            a: v,
            n: v,
            s: v,
            l: v,
            i: v,
            m: v,
            has_fundamentals,
        }
    }

    #[test]
    fn uniform_scores_map_linearly() {
        let w = CompositeWeights::default();
        assert_approx(composite_score(&scores(1.0, true), &w), 100.0, 1e-9);
        assert_approx(composite_score(&scores(0.5, false), &w), 50.0, 1e-9);
        assert_eq!(composite_score(&scores(0.0, true), &w), 0.0);
    }

    #[test]
    fn degraded_path_ignores_c_and_a() {
        let w = CompositeWeights::default();
        let mut s = scores(0.8, false);
        s.c = 0.0;
        s.a = 0.0;
        // renormalised weights on a uniform 0.8 give exactly 80
        assert_approx(composite_score(&s, &w), 80.0, 1e-9);
        // the full path would have penalised the zeros
        s.has_fundamentals = true;
        assert_approx(composite_score(&s, &w), 0.65 * 80.0, 1e-9);
    }

    #[test]
    fn degraded_weights_sum_to_one() {
        let d = CompositeWeights::default().degraded();
        assert!((d.sum() - 1.0).abs() < WEIGHT_TOLERANCE);
        assert_approx(d.l, 0.20 / 0.65, 1e-12);
    }

    #[test]
    fn is_buy_thresholds() {
        let bars = make_bars(&(0..40).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let market = MarketTrend::neutral("SPY", &bars, &MarketConfig::default());
        let inputs = SymbolInputs {
            symbol: "ACME",
            bars: &bars,
            fundamentals: &Fundamentals::default(),
            ownership: &OwnershipHistory::default(),
            rs: 90.0,
        };
        let mut result = evaluate_canslim(inputs, &market, &EngineConfig::default()).unwrap();
        result.composite = 70.0;
        assert!(result.is_buy(70.0, 5.0));
        result.rs = 4.9;
        assert!(!result.is_buy(70.0, 5.0));
        result.rs = 50.0;
        result.composite = 69.9;
        assert!(!result.is_buy(70.0, 5.0));
    }

    #[test]
    fn too_few_bars_is_insufficient_history() {
        let bars = make_bars(&[100.0; 29]);
        let market = MarketTrend::neutral("SPY", &bars, &MarketConfig::default());
        let inputs = SymbolInputs {
            symbol: "ACME",
            bars: &bars,
            fundamentals: &Fundamentals::default(),
            ownership: &OwnershipHistory::default(),
            rs: 50.0,
        };
        let err = evaluate_canslim(inputs, &market, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, ProviderError::InsufficientHistory { have: 29, need: 30, .. }));
    }

    #[test]
    fn technical_only_symbol_uses_degraded_path() {
        let bars = make_bars(&(0..60).map(|i| 50.0 + i as f64).collect::<Vec<_>>());
        let market = MarketTrend::neutral("SPY", &bars, &MarketConfig::default());
        let inputs = SymbolInputs {
            symbol: "IPO",
            bars: &bars,
            fundamentals: &Fundamentals::default(),
            ownership: &OwnershipHistory::default(),
            rs: 80.0,
        };
        let result = evaluate_canslim(inputs, &market, &EngineConfig::default()).unwrap();
        assert!(!result.has_fundamentals());
        assert_eq!(result.scores.c, 0.0);
        assert_eq!(result.scores.i, 0.1);
        assert_approx(result.scores.l, 0.64, 1e-12);
        assert_eq!(result.metrics.rs_percentile, Some(80.0));
        assert_eq!(result.metrics.latest_close, Some(109.0));
        assert_eq!(result.as_of, bars[59].date);
        let expected = composite_score(&result.scores, &CompositeWeights::default());
        assert_eq!(result.composite, expected);
        assert!((0.0..=100.0).contains(&result.composite));
    }

    #[test]
    fn unranked_symbol_has_no_rs_metric() {
        let bars = make_bars(&(0..40).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let market = MarketTrend::neutral("SPY", &bars, &MarketConfig::default());
        let inputs = SymbolInputs {
            symbol: "NEW",
            bars: &bars,
            fundamentals: &Fundamentals::default(),
            ownership: &OwnershipHistory::default(),
            rs: 0.0,
        };
        let result = evaluate_canslim(inputs, &market, &EngineConfig::default()).unwrap();
        assert_eq!(result.scores.l, 0.0);
        assert_eq!(result.metrics.rs_percentile, None);
    }

    #[test]
    fn fundamentals_flag_set_by_annual_growth() {
        let bars = make_bars(&[100.0; 40]);
        let market = MarketTrend::neutral("SPY", &bars, &MarketConfig::default());
        let annual = (0..3)
            .map(|y| FundamentalSnapshot {
                symbol: "ACME".into(),
                period_type: PeriodType::Annual,
                period_end: NaiveDate::from_ymd_opt(2021 + y, 12, 31).unwrap(),
                net_income: Some(100.0 * (1.3f64).powi(y)),
                revenue: None,
                eps: None,
            })
            .collect();
        let fundamentals = Fundamentals {
            annual,
            ..Default::default()
        };
        let ownership = OwnershipHistory::new(OwnershipSnapshot {
            held_percent_institutions: Some(0.5),
            num_institutional_holders: Some(300),
            period: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        });
        let inputs = SymbolInputs {
            symbol: "ACME",
            bars: &bars,
            fundamentals: &fundamentals,
            ownership: &ownership,
            rs: 60.0,
        };
        let result = evaluate_canslim(inputs, &market, &EngineConfig::default()).unwrap();
        assert!(result.has_fundamentals());
        assert!(result.metrics.current_growth.is_none());
        assert!(result.metrics.annual_growth.unwrap() > 0.29);
        assert_eq!(result.metrics.institutional_ownership, Some(0.5));
    }
}
