//! Multi-symbol close alignment.
//!
//! Closes for every symbol are laid onto the union of all dates. Missing dates
//! get NaN (no forward-fill); ranking drops NaN per series afterwards.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::domain::{PriceBar, Symbol};

#[derive(Debug, Clone, Default)]
pub struct AlignedCloses {
    /// Common date axis, ascending.
    pub dates: Vec<NaiveDate>,
    /// One entry per date for every symbol.
    pub closes: BTreeMap<Symbol, Vec<f64>>,
}

impl AlignedCloses {
    /// Series with the NaN gaps removed.
    pub fn dense(&self, symbol: &str) -> Option<Vec<f64>> {
        self.closes
            .get(symbol)
            .map(|s| s.iter().copied().filter(|v| !v.is_nan()).collect())
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.closes.keys()
    }
}

/// Align closes of several symbols onto a common timeline.
pub fn align_closes(series: &BTreeMap<Symbol, Vec<PriceBar>>) -> AlignedCloses {
    let dates: Vec<NaiveDate> = series
        .values()
        .flatten()
        .map(|b| b.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let closes = series
        .iter()
        .map(|(symbol, bars)| {
            let by_date: HashMap<NaiveDate, f64> = bars.iter().map(|b| (b.date, b.close)).collect();
            let aligned = dates
                .iter()
                .map(|d| by_date.get(d).copied().unwrap_or(f64::NAN))
                .collect();
            (symbol.clone(), aligned)
        })
        .collect();

    AlignedCloses { dates, closes }
}
