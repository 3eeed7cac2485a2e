//! In-memory provider for tests, dry runs and pre-fetched data.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::provider::{
    FundamentalsSource, OwnershipSource, PeerUniverse, PriceHistory, ProviderError,
};
use crate::domain::{slice_as_of, Fundamentals, OwnershipHistory, PriceBar, Symbol};

#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    bars: HashMap<Symbol, Vec<PriceBar>>,
    fundamentals: HashMap<Symbol, Fundamentals>,
    ownership: HashMap<Symbol, OwnershipHistory>,
    universe: Option<Vec<Symbol>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bars are sorted by date on insert.
    pub fn with_bars(mut self, symbol: impl Into<Symbol>, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        self.bars.insert(symbol.into(), bars);
        self
    }

    pub fn with_fundamentals(mut self, symbol: impl Into<Symbol>, f: Fundamentals) -> Self {
        self.fundamentals.insert(symbol.into(), f);
        self
    }

    pub fn with_ownership(mut self, symbol: impl Into<Symbol>, o: OwnershipHistory) -> Self {
        self.ownership.insert(symbol.into(), o);
        self
    }

    pub fn with_universe<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.universe = Some(symbols.into_iter().map(Into::into).collect());
        self
    }

    /// Symbols with price history, sorted.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut out: Vec<Symbol> = self.bars.keys().cloned().collect();
        out.sort();
        out
    }
}

impl PriceHistory for InMemoryProvider {
    fn bars(&self, symbol: &str, as_of: Option<NaiveDate>) -> Result<Vec<PriceBar>, ProviderError> {
        let bars = self
            .bars
            .get(symbol)
            .ok_or_else(|| ProviderError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;
        Ok(match as_of {
            Some(date) => slice_as_of(bars, date).to_vec(),
            None => bars.clone(),
        })
    }
}

impl FundamentalsSource for InMemoryProvider {
    fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, ProviderError> {
        Ok(self.fundamentals.get(symbol).cloned().unwrap_or_default())
    }
}

impl OwnershipSource for InMemoryProvider {
    fn ownership(&self, symbol: &str) -> Result<OwnershipHistory, ProviderError> {
        Ok(self.ownership.get(symbol).cloned().unwrap_or_default())
    }
}

impl PeerUniverse for InMemoryProvider {
    fn peers(&self, _as_of: Option<NaiveDate>) -> Result<Vec<Symbol>, ProviderError> {
        self.universe
            .clone()
            .ok_or_else(|| ProviderError::Unavailable("no universe configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 10,
        }
    }

    #[test]
    fn bars_sorted_and_sliced() {
        let p = InMemoryProvider::new().with_bars("ACME", vec![bar(3, 3.0), bar(1, 1.0), bar(2, 2.0)]);
        let all = p.bars("ACME", None).unwrap();
        assert_eq!(all.iter().map(|b| b.close).collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
        let sliced = p
            .bars("ACME", Some(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()))
            .unwrap();
        assert_eq!(sliced.len(), 2);
    }

    #[test]
    fn unknown_symbol_is_not_found() {
        let p = InMemoryProvider::new();
        assert!(matches!(
            p.bars("NOPE", None),
            Err(ProviderError::SymbolNotFound { .. })
        ));
    }

    #[test]
    fn missing_fundamentals_and_ownership_are_empty() {
        let p = InMemoryProvider::new();
        assert!(p.fundamentals("ACME").unwrap().is_empty());
        assert!(p.ownership("ACME").unwrap().current.is_none());
    }

    #[test]
    fn universe_unavailable_until_configured() {
        assert!(InMemoryProvider::new().peers(None).is_err());
        let p = InMemoryProvider::new().with_universe(["A", "B"]);
        assert_eq!(p.peers(None).unwrap(), vec!["A", "B"]);
    }
}
