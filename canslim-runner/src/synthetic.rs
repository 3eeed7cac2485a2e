//! Synthetic market data for tests and dry runs.
//!
//! Each symbol gets a random walk seeded from its name, so the same symbol and
//! date range always produce the same bars. Weekends are skipped. The data is
//! clearly fake; nothing here should feed a real screen.

use std::collections::BTreeMap;

use canslim_core::data::InMemoryProvider;
use canslim_core::domain::{PriceBar, Symbol};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default half-width of the uniform daily return noise.
pub const DEFAULT_VOLATILITY: f64 = 0.02;

/// A set of synthetic symbols over one date range.
#[derive(Debug, Clone)]
pub struct SyntheticMarket {
    start: NaiveDate,
    end: NaiveDate,
    volatility: f64,
    /// Mean daily return per symbol.
    drifts: BTreeMap<Symbol, f64>,
}

impl SyntheticMarket {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            volatility: DEFAULT_VOLATILITY,
            drifts: BTreeMap::new(),
        }
    }

    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility.max(0.0);
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<Symbol>, drift: f64) -> Self {
        self.drifts.insert(symbol.into(), drift);
        self
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        self.drifts.keys().cloned().collect()
    }

    /// Bars for one registered symbol; empty for an unknown one.
    pub fn bars(&self, symbol: &str) -> Vec<PriceBar> {
        self.drifts
            .get(symbol)
            .map(|drift| generate_bars(symbol, self.start, self.end, *drift, self.volatility))
            .unwrap_or_default()
    }

    /// Provider holding every symbol, with all of them as the peer universe.
    pub fn provider(&self) -> InMemoryProvider {
        let provider = self
            .drifts
            .keys()
            .fold(InMemoryProvider::new(), |p, symbol| p.with_bars(symbol.clone(), self.bars(symbol)));
        provider.with_universe(self.symbols())
    }
}

/// Random walk from 100 with `drift` plus uniform noise in `±volatility` per day.
pub fn generate_bars(
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    drift: f64,
    volatility: f64,
) -> Vec<PriceBar> {
    // Deterministic seed from symbol name
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += chrono::Duration::days(1);
            continue;
        }

        let noise: f64 = if volatility > 0.0 {
            rng.gen_range(-volatility..volatility)
        } else {
            0.0
        };
        let open = price;
        let close = (price * (1.0 + drift + noise)).max(0.01);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);

        bars.push(PriceBar {
            date: current,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}
