//! Date-keyed RS snapshot cache with single-flight computation.
//!
//! Entries are keyed by `(universe hash, evaluation date)`. Every key owns a
//! `OnceLock`: the first caller computes, concurrent callers for the same key
//! block on that computation and share its result. Requesting a date not yet
//! cached evicts every finished entry for other dates. Entries still being
//! computed are kept until a later eviction, so a late caller for that date
//! joins the running computation instead of starting another.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use chrono::NaiveDate;
use tracing::debug;

use super::ranker::RsSnapshot;
use crate::config::RsConfig;

type Key = (String, NaiveDate);
type Slot = Arc<OnceLock<Arc<RsSnapshot>>>;

#[derive(Debug, Default)]
pub struct RsCache {
    slots: Mutex<HashMap<Key, Slot>>,
    computations: AtomicUsize,
}

impl RsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot for the key, computing it at most once.
    pub fn get_or_compute<F>(&self, universe_hash: &str, as_of: NaiveDate, compute: F) -> Arc<RsSnapshot>
    where
        F: FnOnce() -> RsSnapshot,
    {
        let key = (universe_hash.to_string(), as_of);
        let slot = {
            let mut slots = self.slots();
            if !slots.contains_key(&key) {
                let before = slots.len();
                slots.retain(|(_, date), slot| *date == as_of || slot.get().is_none());
                if slots.len() < before {
                    debug!(%as_of, evicted = before - slots.len(), "RS cache: evicted other dates");
                }
            }
            Arc::clone(slots.entry(key).or_default())
        };

        if let Some(snapshot) = slot.get() {
            debug!(%as_of, "RS cache hit");
            return Arc::clone(snapshot);
        }

        // lock released: other keys stay available while this one computes
        Arc::clone(slot.get_or_init(|| {
            debug!(%as_of, "RS cache miss, ranking universe");
            self.computations.fetch_add(1, Ordering::SeqCst);
            Arc::new(compute())
        }))
    }

    /// Drop every entry for `as_of`.
    pub fn invalidate(&self, as_of: NaiveDate) {
        self.slots().retain(|(_, date), _| *date != as_of);
    }

    pub fn clear(&self) {
        self.slots().clear();
    }

    /// Number of snapshots computed over the cache's lifetime.
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<Key, Slot>> {
        // a panic inside `compute` never holds this lock, so poisoning carries no torn state
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Cache key component identifying the universe and the ranking parameters.
pub fn universe_hash<S: AsRef<str>>(symbols: &[S], config: &RsConfig) -> String {
    let mut sorted: Vec<&str> = symbols.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut hasher = blake3::Hasher::new();
    for symbol in sorted {
        hasher.update(symbol.as_bytes());
        hasher.update(b"\n");
    }
    hasher.update(&(config.quarter_length as u64).to_le_bytes());
    for weight in config.quarter_weights {
        hasher.update(&weight.to_le_bytes());
    }
    hasher.update(&config.rs_min.to_le_bytes());
    hasher.update(&config.rs_multiplier.to_le_bytes());
    hasher.update(&(config.min_universe_size as u64).to_le_bytes());
    hasher.finalize().to_hex().to_string()
}
