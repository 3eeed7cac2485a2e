//! Statement line-item discovery.
//!
//! Providers hand over statements as label → values tables whose labels vary
//! between sources ("Basic EPS", "basic_eps", "Net Income Common Stockholders").
//! Rows are located with ordered rule lists: labels are normalised to lowercase
//! alphanumerics and the first rule whose pattern is contained in a label wins.
//! Within one rule, rows are searched in the order the statement lists them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{BalanceSheetSnapshot, FundamentalSnapshot, PeriodType};

/// Canonical line item a rule maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineField {
    Eps,
    NetIncome,
    Revenue,
    Equity,
}

/// One (pattern, field) rule. Patterns are already normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRule {
    pub pattern: &'static str,
    pub field: LineField,
}

const fn rule(pattern: &'static str, field: LineField) -> RowRule {
    RowRule { pattern, field }
}

/// Per-share earnings first, net income as the fallback.
pub const EARNINGS_RULES: &[RowRule] = &[
    rule("basiceps", LineField::Eps),
    rule("dilutedeps", LineField::Eps),
    rule("netincome", LineField::NetIncome),
];

pub const NET_INCOME_RULES: &[RowRule] = &[rule("netincome", LineField::NetIncome)];

pub const REVENUE_RULES: &[RowRule] = &[
    rule("totalrevenue", LineField::Revenue),
    rule("revenue", LineField::Revenue),
];

pub const EQUITY_RULES: &[RowRule] = &[
    rule("stockholdersequity", LineField::Equity),
    rule("shareholdersequity", LineField::Equity),
    rule("totalequity", LineField::Equity),
    rule("commonstockequity", LineField::Equity),
];

/// Outcome of a rule search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMatch<'a> {
    Found { label: &'a str, field: LineField },
    NotFound,
}

/// Raw statement as delivered by a provider.
///
/// `periods` is ordered oldest → newest and every row holds one value per period.
/// Rows keep the provider's order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementTable {
    pub periods: Vec<NaiveDate>,
    pub rows: Vec<(String, Vec<Option<f64>>)>,
}

impl StatementTable {
    pub fn new(periods: Vec<NaiveDate>) -> Self {
        Self {
            periods,
            rows: Vec::new(),
        }
    }

    /// Append a row; a repeated label replaces the earlier row in place.
    pub fn with_row(mut self, label: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let label = label.into();
        match self.rows.iter_mut().find(|(l, _)| *l == label) {
            Some(row) => row.1 = values,
            None => self.rows.push((label, values)),
        }
        self
    }

    /// Apply `rules` in priority order; the first rule matching any label wins.
    pub fn find_row(&self, rules: &[RowRule]) -> RowMatch<'_> {
        match self.find(rules) {
            Some((label, field, _)) => RowMatch::Found { label, field },
            None => RowMatch::NotFound,
        }
    }

    fn find(&self, rules: &[RowRule]) -> Option<(&str, LineField, &[Option<f64>])> {
        rules.iter().find_map(|rule| {
            self.rows
                .iter()
                .find(|(label, _)| normalize_label(label).contains(rule.pattern))
                .map(|(label, values)| (label.as_str(), rule.field, values.as_slice()))
        })
    }

    /// Values of the row matched by `rules`, restricted to rules mapping onto `field`.
    fn values_for(&self, rules: &[RowRule], field: LineField) -> Option<&[Option<f64>]> {
        self.find(rules)
            .filter(|(_, f, _)| *f == field)
            .map(|(_, _, values)| values)
    }
}

/// Lowercase and strip everything but ASCII alphanumerics.
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn value_at(row: Option<&[Option<f64>]>, i: usize) -> Option<f64> {
    row.and_then(|r| r.get(i).copied().flatten())
        .filter(|v| v.is_finite())
}

/// Build income-statement snapshots, one per period, oldest first.
pub fn income_snapshots(
    symbol: &str,
    period_type: PeriodType,
    table: &StatementTable,
) -> Vec<FundamentalSnapshot> {
    let eps = table.values_for(EARNINGS_RULES, LineField::Eps);
    let net_income = table.values_for(NET_INCOME_RULES, LineField::NetIncome);
    let revenue = table.values_for(REVENUE_RULES, LineField::Revenue);

    table
        .periods
        .iter()
        .enumerate()
        .map(|(i, &period_end)| FundamentalSnapshot {
            symbol: symbol.to_string(),
            period_type,
            period_end,
            net_income: value_at(net_income, i),
            revenue: value_at(revenue, i),
            eps: value_at(eps, i),
        })
        .collect()
}

/// Build balance-sheet snapshots from the equity line.
pub fn balance_sheet_snapshots(table: &StatementTable) -> Vec<BalanceSheetSnapshot> {
    let equity = table.values_for(EQUITY_RULES, LineField::Equity);
    table
        .periods
        .iter()
        .enumerate()
        .map(|(i, &period_end)| BalanceSheetSnapshot {
            period_end,
            total_equity: value_at(equity, i),
        })
        .collect()
}
