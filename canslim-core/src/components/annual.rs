//! A: annual earnings growth and return on equity.

use serde::{Deserialize, Serialize};

use super::{consistency, growth_rate, growth_score, ComponentEval};
use crate::config::AnnualEarningsConfig;
use crate::domain::{
    earnings_series, latest_equity, BalanceSheetSnapshot, EarningsBasis, FundamentalSnapshot,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualEarnings {
    pub basis: EarningsBasis,
    /// Most recent year's growth.
    pub growth: f64,
    /// `growth` scored against the target, before weighting.
    pub growth_score: f64,
    pub consistency: f64,
    pub roe: Option<f64>,
    /// Fewer than `min_years` of growth history; limited weights and discount applied.
    pub limited_history: bool,
}

/// Evaluate A over annual snapshots (oldest → newest) and the balance sheet.
pub fn evaluate_a(
    annual: &[FundamentalSnapshot],
    balance_sheet: &[BalanceSheetSnapshot],
    config: &AnnualEarningsConfig,
) -> ComponentEval<AnnualEarnings> {
    let Some((basis, earnings)) = earnings_series(annual) else {
        return ComponentEval::unavailable(0.0);
    };

    // most recent first
    let growths: Vec<Option<f64>> = earnings
        .windows(2)
        .rev()
        .map(|w| growth_rate(w[1], w[0]))
        .collect();
    let Some(growth) = growths.first().copied().flatten() else {
        return ComponentEval::unavailable(0.0);
    };

    let growth_subscore = growth_score(growth, config.growth_target);
    let roe = return_on_equity(annual, balance_sheet);
    let roe_subscore = roe.map_or(0.0, |r| growth_score(r, config.roe_target));

    let limited_history = growths.len() < config.min_years;
    let (window, weights) = if limited_history {
        (growths.len(), config.limited_weights)
    } else {
        (config.min_years, config.full_weights)
    };
    let valid: Vec<f64> = growths[..window].iter().flatten().copied().collect();
    let consistency = consistency(&valid, config.growth_target);

    let mut score = weights.growth * growth_subscore
        + weights.consistency * consistency
        + weights.roe * roe_subscore;
    if limited_history {
        score *= config.limited_history_discount;
    }

    ComponentEval::scored(
        score,
        AnnualEarnings {
            basis,
            growth,
            growth_score: growth_subscore,
            consistency,
            roe,
            limited_history,
        },
    )
}

/// Latest net income over latest positive equity.
fn return_on_equity(annual: &[FundamentalSnapshot], balance_sheet: &[BalanceSheetSnapshot]) -> Option<f64> {
    let net_income = annual.last()?.net_income?;
    let equity = latest_equity(balance_sheet)?;
    if equity <= 0.0 || !net_income.is_finite() {
        return None;
    }
    Some(net_income / equity)
}
