//! S: supply and demand.
//!
//! Four sub-signals: float size (smaller floats move more on demand), average
//! volume on up days versus down days, a volume surge near the high, and a
//! recent power gap.

use serde::{Deserialize, Serialize};

use super::{clip01, mean_volume, tail, ComponentEval, PriceContext};
use crate::config::SupplyConfig;
use crate::domain::PriceBar;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyDemand {
    pub shares_outstanding: Option<f64>,
    pub float_score: f64,
    pub up_down_ratio: Option<f64>,
    pub up_down_score: f64,
    /// Recent average volume over the longer average.
    pub volume_surge: Option<f64>,
    pub surge_breakout_score: f64,
    pub power_gap: bool,
}

/// Evaluate S from bars ordered oldest → newest.
pub fn evaluate_s(
    bars: &[PriceBar],
    shares_outstanding: Option<f64>,
    price: Option<&PriceContext>,
    config: &SupplyConfig,
) -> ComponentEval<SupplyDemand> {
    if bars.len() < 2 {
        return ComponentEval::unavailable(0.0);
    }

    let shares_outstanding = shares_outstanding.filter(|s| s.is_finite() && *s > 0.0);
    let float_score = shares_outstanding.map_or(config.missing_float_score, |s| float_band_score(s, config));

    let up_down_ratio = up_down_volume_ratio(tail(bars, config.up_down_window + 1), config.up_down_ratio_cap);
    let up_down_score = up_down_ratio.map_or(0.0, |r| r.min(config.up_down_ratio_cap) / config.up_down_ratio_cap);

    let volume_surge = volume_surge(bars, config);
    let surge_score = volume_surge.map_or(0.0, |s| clip01(s / config.surge_multiplier));
    let breakout_score = price.map_or(0.0, |p| clip01(p.proximity / config.breakout_threshold));
    let surge_breakout_score = 0.5 * surge_score + 0.5 * breakout_score;

    let power_gap = has_power_gap(bars, config);

    let score = config.float_weight * float_score
        + config.up_down_weight * up_down_score
        + config.surge_breakout_weight * surge_breakout_score
        + config.power_gap_weight * if power_gap { 1.0 } else { 0.0 };

    ComponentEval::scored(
        score,
        SupplyDemand {
            shares_outstanding,
            float_score,
            up_down_ratio,
            up_down_score,
            volume_surge,
            surge_breakout_score,
            power_gap,
        },
    )
}

/// Band score for a share count; band edges are inclusive upper bounds.
pub fn float_band_score(shares: f64, config: &SupplyConfig) -> f64 {
    let band = config
        .float_band_edges
        .iter()
        .position(|&edge| shares <= edge)
        .unwrap_or(config.float_band_edges.len());
    config.float_band_scores[band]
}

/// Mean volume on up days over mean volume on down days.
///
/// Only up days: the cap. Only down days: 0. Neither: `None`.
fn up_down_volume_ratio(bars: &[PriceBar], cap: f64) -> Option<f64> {
    let (mut up_sum, mut up_days, mut down_sum, mut down_days) = (0.0, 0usize, 0.0, 0usize);
    for w in bars.windows(2) {
        if w[1].close > w[0].close {
            up_sum += w[1].volume as f64;
            up_days += 1;
        } else if w[1].close < w[0].close {
            down_sum += w[1].volume as f64;
            down_days += 1;
        }
    }
    match (up_days, down_days) {
        (0, 0) => None,
        (_, 0) => Some(cap),
        (0, _) => Some(0.0),
        _ => {
            let down_avg = down_sum / down_days as f64;
            if down_avg <= 0.0 {
                Some(cap)
            } else {
                Some((up_sum / up_days as f64) / down_avg)
            }
        }
    }
}

fn volume_surge(bars: &[PriceBar], config: &SupplyConfig) -> Option<f64> {
    let base = mean_volume(tail(bars, config.average_volume_window));
    if base <= 0.0 {
        return None;
    }
    Some(mean_volume(tail(bars, config.surge_window)) / base)
}

/// A gap-up open of at least `gap_threshold` over the prior close, on volume at
/// least `gap_volume_multiple` times the average of the bars before it.
fn has_power_gap(bars: &[PriceBar], config: &SupplyConfig) -> bool {
    let n = bars.len();
    let start = n.saturating_sub(config.gap_lookback).max(1);
    (start..n).any(|i| {
        let prev_close = bars[i - 1].close;
        if !(prev_close > 0.0) {
            return false;
        }
        let gap = bars[i].open / prev_close - 1.0;
        let before = &bars[i.saturating_sub(config.average_volume_window)..i];
        let avg = mean_volume(before);
        gap >= config.gap_threshold && avg > 0.0 && bars[i].volume as f64 >= config.gap_volume_multiple * avg
    })
}
