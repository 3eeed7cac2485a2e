//! Two-stage momentum setup detection.
//!
//! - [`strength`]: stage 1, qualify the trailing window as a strong uptrend
//! - [`pullback`]: stage 2, flag EMA retests and reclaims in the last few bars

pub mod pullback;
pub mod strength;

pub use pullback::{scan_pullbacks, PullbackDetector, SignalType, TrendSignal};
pub use strength::{analyze_trend, TrendStrength};
