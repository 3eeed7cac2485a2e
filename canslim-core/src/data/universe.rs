//! Peer universe: sector-organised symbol lists and resolution with fallback.
//!
//! A universe can be stored as TOML (`[sectors]` table of symbol lists). When
//! the configured source fails or comes back empty, ranking falls back to a
//! small fixed seed list so RS always produces a result.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::provider::{PeerUniverse, ProviderError};
use crate::domain::Symbol;

/// Seed list used when no universe can be resolved.
pub const FALLBACK_UNIVERSE: [&str; 7] = ["AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub sectors: BTreeMap<String, Vec<Symbol>>,
}

impl Universe {
    pub fn from_file(path: &Path) -> Result<Self, ProviderError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProviderError::Unavailable(format!("read universe file: {e}")))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ProviderError> {
        toml::from_str(content).map_err(|e| ProviderError::Other(format!("parse universe TOML: {e}")))
    }

    /// Single-sector universe from a flat list.
    pub fn from_symbols<I, S>(name: &str, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let mut sectors = BTreeMap::new();
        sectors.insert(name.to_string(), symbols.into_iter().map(Into::into).collect());
        Self { sectors }
    }

    pub fn fallback() -> Self {
        Self::from_symbols("Seed", FALLBACK_UNIVERSE)
    }

    /// Every symbol across sectors, sorted and deduplicated.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut all: Vec<Symbol> = self.sectors.values().flatten().cloned().collect();
        all.sort();
        all.dedup();
        all
    }

    pub fn len(&self) -> usize {
        self.symbols().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.values().all(Vec::is_empty)
    }
}

impl PeerUniverse for Universe {
    fn peers(&self, _as_of: Option<NaiveDate>) -> Result<Vec<Symbol>, ProviderError> {
        Ok(self.symbols())
    }
}

/// Resolve the ranking universe for `targets`.
///
/// Failure or an empty list falls back to [`FALLBACK_UNIVERSE`]. Targets are
/// always included. The result is sorted and free of duplicates.
pub fn resolve_universe<S: AsRef<str>>(
    source: &dyn PeerUniverse,
    as_of: Option<NaiveDate>,
    targets: &[S],
) -> Vec<Symbol> {
    let mut symbols = match source.peers(as_of) {
        Ok(list) if !list.is_empty() => list,
        Ok(_) => {
            warn!("peer universe is empty, using fallback seed list");
            fallback_symbols()
        }
        Err(e) => {
            warn!(error = %e, "peer universe unavailable, using fallback seed list");
            fallback_symbols()
        }
    };
    symbols.extend(targets.iter().map(|t| t.as_ref().to_string()));
    symbols.sort();
    symbols.dedup();
    debug!(count = symbols.len(), targets = targets.len(), "resolved ranking universe");
    symbols
}

fn fallback_symbols() -> Vec<Symbol> {
    Universe::fallback().symbols()
}
