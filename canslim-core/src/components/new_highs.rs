//! N: new products (revenue growth) and price leadership (proximity to the 52-week high).

use serde::{Deserialize, Serialize};

use super::{growth_rate, growth_score, ComponentEval, PriceContext};
use crate::config::NewHighsConfig;
use crate::domain::FundamentalSnapshot;

/// Quarters between a quarter and its year-ago comparison.
const YEAR_AGO: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHighs {
    pub revenue_growth: Option<f64>,
    pub proximity: Option<f64>,
    pub proximity_score: f64,
}

/// Evaluate N. Either input may be missing; with both missing N is unavailable.
pub fn evaluate_n(
    quarterly: &[FundamentalSnapshot],
    price: Option<&PriceContext>,
    config: &NewHighsConfig,
) -> ComponentEval<NewHighs> {
    let revenue_growth = yoy_revenue_growth(quarterly);
    let proximity = price.map(|p| p.proximity).filter(|p| p.is_finite());
    if revenue_growth.is_none() && proximity.is_none() {
        return ComponentEval::unavailable(0.0);
    }

    let revenue_score = revenue_growth.map_or(0.0, |g| growth_score(g, config.revenue_growth_target));
    let proximity_score = proximity.map_or(0.0, |p| proximity_curve(p, config));

    ComponentEval::scored(
        config.revenue_weight * revenue_score + config.proximity_weight * proximity_score,
        NewHighs {
            revenue_growth,
            proximity,
            proximity_score,
        },
    )
}

/// Three-tier credit for closeness to the high.
///
/// Full credit at `full_credit_proximity`; linear from 0 to 1 across the upper
/// tier; linear up to `lower_tier_max` across the lower tier; nothing below.
pub fn proximity_curve(proximity: f64, config: &NewHighsConfig) -> f64 {
    let full = config.full_credit_proximity;
    let upper = config.upper_tier_floor;
    let lower = config.lower_tier_floor;
    if proximity >= full {
        1.0
    } else if proximity >= upper {
        (proximity - upper) / (full - upper)
    } else if proximity >= lower {
        (proximity - lower) / (upper - lower) * config.lower_tier_max
    } else {
        0.0
    }
}

fn yoy_revenue_growth(quarterly: &[FundamentalSnapshot]) -> Option<f64> {
    let n = quarterly.len();
    if n <= YEAR_AGO {
        return None;
    }
    growth_rate(quarterly[n - 1].revenue, quarterly[n - 1 - YEAR_AGO].revenue)
}
