//! Fundamental snapshots: income-statement periods and balance-sheet equity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reporting cadence of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    Quarterly,
    Annual,
}

/// One reporting period of an income statement.
///
/// `net_income` is optional because some statements omit the line; evaluators
/// treat a missing value the same as an unusable one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    pub symbol: String,
    pub period_type: PeriodType,
    pub period_end: NaiveDate,
    pub net_income: Option<f64>,
    pub revenue: Option<f64>,
    pub eps: Option<f64>,
}

/// One reporting period of a balance sheet (only the equity line is used).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetSnapshot {
    pub period_end: NaiveDate,
    pub total_equity: Option<f64>,
}

/// Everything the fundamentals provider returns for a symbol.
///
/// All sequences are ordered oldest → newest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub quarterly: Vec<FundamentalSnapshot>,
    pub annual: Vec<FundamentalSnapshot>,
    pub balance_sheet: Vec<BalanceSheetSnapshot>,
    /// Shares outstanding (or float) as last reported.
    pub shares_outstanding: Option<f64>,
}

impl Fundamentals {
    pub fn is_empty(&self) -> bool {
        self.quarterly.is_empty()
            && self.annual.is_empty()
            && self.balance_sheet.is_empty()
            && self.shares_outstanding.is_none()
    }
}

/// Most recent reported shareholders' equity, skipping periods without the line.
pub fn latest_equity(balance_sheet: &[BalanceSheetSnapshot]) -> Option<f64> {
    balance_sheet
        .iter()
        .rev()
        .find_map(|b| b.total_equity.filter(|v| v.is_finite()))
}

/// Which earnings line a growth series was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarningsBasis {
    PerShare,
    NetIncome,
}

/// Pick the best earnings series: per-share when any period reports EPS,
/// otherwise net income. `None` when neither line is present at all.
pub fn earnings_series(
    periods: &[FundamentalSnapshot],
) -> Option<(EarningsBasis, Vec<Option<f64>>)> {
    if periods.iter().any(|p| p.eps.is_some()) {
        return Some((
            EarningsBasis::PerShare,
            periods.iter().map(|p| p.eps).collect(),
        ));
    }
    if periods.iter().any(|p| p.net_income.is_some()) {
        return Some((
            EarningsBasis::NetIncome,
            periods.iter().map(|p| p.net_income).collect(),
        ));
    }
    None
}
