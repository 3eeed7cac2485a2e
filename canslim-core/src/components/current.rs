//! C: current quarterly earnings.
//!
//! With at least `min_quarters` quarters, growth is year-over-year (each
//! quarter against the same quarter a year earlier) and the score blends the
//! latest growth, how many recent quarters hit the target, and whether growth
//! is accelerating. Shorter histories fall back to latest-vs-prior quarter.

use serde::{Deserialize, Serialize};

use super::{consistency, growth_rate, growth_score, tail, ComponentEval};
use crate::config::CurrentEarningsConfig;
use crate::domain::{earnings_series, EarningsBasis, FundamentalSnapshot};

const QUARTERS_PER_YEAR: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthMethod {
    YearOverYear,
    QuarterOverQuarter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentEarnings {
    pub basis: EarningsBasis,
    pub method: GrowthMethod,
    /// Latest quarter's growth as a fraction.
    pub growth: f64,
    pub consistency: Option<f64>,
    pub acceleration: Option<f64>,
}

/// Evaluate C over quarterly snapshots ordered oldest → newest.
pub fn evaluate_c(
    quarterly: &[FundamentalSnapshot],
    config: &CurrentEarningsConfig,
) -> ComponentEval<CurrentEarnings> {
    let Some((basis, earnings)) = earnings_series(quarterly) else {
        return ComponentEval::unavailable(0.0);
    };
    let n = earnings.len();
    if n < 2 {
        return ComponentEval::unavailable(0.0);
    }

    if n < config.min_quarters {
        return match growth_rate(earnings[n - 1], earnings[n - 2]) {
            Some(growth) => ComponentEval::scored(
                growth_score(growth, config.growth_target),
                CurrentEarnings {
                    basis,
                    method: GrowthMethod::QuarterOverQuarter,
                    growth,
                    consistency: None,
                    acceleration: None,
                },
            ),
            None => ComponentEval::unavailable(0.0),
        };
    }

    let yoy: Vec<Option<f64>> = (QUARTERS_PER_YEAR..n)
        .map(|i| growth_rate(earnings[i], earnings[i - QUARTERS_PER_YEAR]))
        .collect();
    let Some(growth) = yoy.last().copied().flatten() else {
        return ComponentEval::unavailable(0.0);
    };

    let recent: Vec<f64> = tail(&yoy, config.consistency_quarters)
        .iter()
        .flatten()
        .copied()
        .collect();
    let consistency = consistency(&recent, config.growth_target);
    let acceleration = acceleration(&recent);

    let score = config.growth_weight * growth_score(growth, config.growth_target)
        + config.consistency_weight * consistency
        + config.acceleration_weight * acceleration;

    ComponentEval::scored(
        score,
        CurrentEarnings {
            basis,
            method: GrowthMethod::YearOverYear,
            growth,
            consistency: Some(consistency),
            acceleration: Some(acceleration),
        },
    )
}

/// Fraction of consecutive pairs where growth increased; 0 with fewer than two values.
fn acceleration(growths: &[f64]) -> f64 {
    if growths.len() < 2 {
        return 0.0;
    }
    let rising = growths.windows(2).filter(|w| w[1] > w[0]).count();
    rising as f64 / (growths.len() - 1) as f64
}
