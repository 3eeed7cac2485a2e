//! Relative-strength ranking.
//!
//! - [`performance`]: quarter-weighted trailing performance, percentile ranks
//! - [`ranker`]: universe snapshot and the ranker that builds it
//! - [`cache`]: date-keyed single-flight snapshot cache

pub mod cache;
pub mod performance;
pub mod ranker;

pub use cache::{universe_hash, RsCache};
pub use performance::{percentile_ranks, weighted_performance};
pub use ranker::{RsRanker, RsSnapshot};
