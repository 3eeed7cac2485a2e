//! I: institutional sponsorship.
//!
//! Ownership is scored on a sweet-spot curve (too little means no sponsorship,
//! too much means the buyers are already in) and blended with the quarterly
//! trend in holder count.

use serde::{Deserialize, Serialize};

use super::ComponentEval;
use crate::config::InstitutionalConfig;
use crate::domain::OwnershipHistory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sponsorship {
    pub held_percent: f64,
    pub curve_score: f64,
    pub holder_change: Option<f64>,
    pub holder_trend_score: f64,
    pub num_holders: Option<u32>,
}

pub fn evaluate_i(ownership: &OwnershipHistory, config: &InstitutionalConfig) -> ComponentEval<Sponsorship> {
    let Some(current) = ownership.current.as_ref() else {
        return ComponentEval::unavailable(config.missing_score);
    };
    let Some(held_percent) = current.held_percent_institutions.filter(|p| p.is_finite() && *p >= 0.0) else {
        return ComponentEval::unavailable(config.missing_score);
    };

    let curve_score = ownership_curve(held_percent, config);
    let holder_change = ownership.holder_change();
    let holder_trend_score = holder_change.map_or(config.missing_trend_score, |c| holder_trend_score(c, config));

    ComponentEval::scored(
        config.ownership_weight * curve_score + config.holder_trend_weight * holder_trend_score,
        Sponsorship {
            held_percent,
            curve_score,
            holder_change,
            holder_trend_score,
            num_holders: current.num_institutional_holders,
        },
    )
}

/// Piecewise-linear sweet-spot curve over the institutional ownership fraction.
pub fn ownership_curve(held: f64, config: &InstitutionalConfig) -> f64 {
    let [ramp_end, ideal_start, ideal_end, decay_end, floor_start] = config.band_edges;
    if held <= 0.0 {
        0.0
    } else if held < ramp_end {
        lerp(held, 0.0, ramp_end, 0.0, config.ramp_score)
    } else if held < ideal_start {
        lerp(held, ramp_end, ideal_start, config.ramp_score, config.ideal_score)
    } else if held <= ideal_end {
        config.ideal_score
    } else if held < decay_end {
        lerp(held, ideal_end, decay_end, config.ideal_score, config.decay_score)
    } else if held < floor_start {
        lerp(held, decay_end, floor_start, config.decay_score, config.floor_score)
    } else {
        config.floor_score
    }
}

/// Band score for the QoQ fractional change in holder count.
pub fn holder_trend_score(change: f64, config: &InstitutionalConfig) -> f64 {
    let [strong, increase, decrease, significant] = config.holder_trend_edges;
    let scores = config.holder_trend_scores;
    if change >= strong {
        scores[0]
    } else if change >= increase {
        scores[1]
    } else if change > decrease {
        scores[2]
    } else if change > significant {
        scores[3]
    } else {
        scores[4]
    }
}

fn lerp(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    y0 + (x - x0) / (x1 - x0) * (y1 - y0)
}
