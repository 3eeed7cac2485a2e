//! Cross-sectional RS ranking over a peer universe.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::cache::{universe_hash, RsCache};
use super::performance::{percentile_ranks, weighted_performance};
use crate::config::RsConfig;
use crate::data::{align_closes, resolve_universe, PeerUniverse, PriceHistory};
use crate::domain::{PriceBar, Symbol};

/// Rankings of one universe on one evaluation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsSnapshot {
    pub as_of: NaiveDate,
    pub universe_hash: String,
    /// Weighted performance of every symbol with enough history.
    pub performance: BTreeMap<Symbol, f64>,
    /// Percentile in (0, 1]; empty when too few symbols ranked.
    pub percentiles: BTreeMap<Symbol, f64>,
    rs_min: f64,
    rs_multiplier: f64,
}

impl RsSnapshot {
    /// Rank dense (NaN-free) close series.
    pub fn from_series(
        as_of: NaiveDate,
        universe_hash: String,
        series: &BTreeMap<Symbol, Vec<f64>>,
        config: &RsConfig,
    ) -> Self {
        let performance: BTreeMap<Symbol, f64> = series
            .iter()
            .filter_map(|(symbol, closes)| {
                weighted_performance(closes, config).map(|p| (symbol.clone(), p))
            })
            .collect();

        let percentiles = if performance.len() < config.min_universe_size {
            debug!(
                ranked = performance.len(),
                required = config.min_universe_size,
                "RS universe too small, every score is 0"
            );
            BTreeMap::new()
        } else {
            let values: Vec<f64> = performance.values().copied().collect();
            performance
                .keys()
                .cloned()
                .zip(percentile_ranks(&values))
                .collect()
        };

        Self {
            as_of,
            universe_hash,
            performance,
            percentiles,
            rs_min: config.rs_min,
            rs_multiplier: config.rs_multiplier,
        }
    }

    /// RS score in `[rs_min, rs_min + rs_multiplier]`, or exactly 0 when unranked.
    pub fn score(&self, symbol: &str) -> f64 {
        self.percentile(symbol)
            .map(|p| p * self.rs_multiplier + self.rs_min)
            .unwrap_or(0.0)
    }

    pub fn percentile(&self, symbol: &str) -> Option<f64> {
        self.percentiles.get(symbol).copied()
    }

    pub fn weighted_performance(&self, symbol: &str) -> Option<f64> {
        self.performance.get(symbol).copied()
    }

    pub fn ranked_count(&self) -> usize {
        self.percentiles.len()
    }
}

/// Builds RS snapshots through a shared [`RsCache`].
#[derive(Debug, Clone)]
pub struct RsRanker {
    config: RsConfig,
    cache: Arc<RsCache>,
}

impl RsRanker {
    pub fn new(config: RsConfig) -> Self {
        Self::with_cache(config, Arc::new(RsCache::new()))
    }

    pub fn with_cache(config: RsConfig, cache: Arc<RsCache>) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &RsConfig {
        &self.config
    }

    pub fn cache(&self) -> &RsCache {
        &self.cache
    }

    /// Snapshot for `universe` on `as_of`, computed at most once per key.
    pub fn snapshot(
        &self,
        prices: &dyn PriceHistory,
        universe: &[Symbol],
        as_of: NaiveDate,
    ) -> Arc<RsSnapshot> {
        let hash = universe_hash(universe, &self.config);
        self.cache.get_or_compute(&hash, as_of, || {
            self.compute(prices, universe, as_of, hash.clone())
        })
    }

    /// Resolve the universe around `target` and return its RS score with the snapshot.
    pub fn rank(
        &self,
        prices: &dyn PriceHistory,
        peers: &dyn PeerUniverse,
        target: &str,
        as_of: NaiveDate,
    ) -> (f64, Arc<RsSnapshot>) {
        let universe = resolve_universe(peers, Some(as_of), &[target]);
        let snapshot = self.snapshot(prices, &universe, as_of);
        (snapshot.score(target), snapshot)
    }

    fn compute(
        &self,
        prices: &dyn PriceHistory,
        universe: &[Symbol],
        as_of: NaiveDate,
        hash: String,
    ) -> RsSnapshot {
        let mut histories: BTreeMap<Symbol, Vec<PriceBar>> = BTreeMap::new();
        for symbol in universe {
            match prices.bars(symbol, Some(as_of)) {
                Ok(bars) if !bars.is_empty() => {
                    histories.insert(symbol.clone(), bars);
                }
                Ok(_) => debug!(%symbol, "no bars before evaluation date, excluded from RS"),
                Err(e) => warn!(%symbol, error = %e, "price history failed, excluded from RS"),
            }
        }

        let aligned = align_closes(&histories);
        let dense: BTreeMap<Symbol, Vec<f64>> = aligned
            .symbols()
            .filter_map(|s| aligned.dense(s).map(|closes| (s.clone(), closes)))
            .collect();

        let snapshot = RsSnapshot::from_series(as_of, hash, &dense, &self.config);
        debug!(
            %as_of,
            universe = universe.len(),
            ranked = snapshot.ranked_count(),
            "RS snapshot computed"
        );
        snapshot
    }
}
