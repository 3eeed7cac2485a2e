//! Run configuration for screening and backtests.

use std::path::Path;

use canslim_core::config::{ConfigError, EngineConfig};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Widest worker pool a run may request.
pub const MAX_WORKERS: usize = 16;

/// Everything needed to reproduce a screen or a backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Symbols to score.
    pub symbols: Vec<String>,
    /// Index used for the market regime.
    pub benchmark: String,
    /// Cross-symbol worker threads; 1 runs inline.
    pub workers: usize,
    /// Buy signal: composite at or above this.
    pub min_composite: f64,
    /// Buy signal: RS at or above this. Also gates momentum setups.
    pub min_rs: f64,
    /// Backtest start date (inclusive).
    pub start: Option<NaiveDate>,
    /// Backtest end date (inclusive).
    pub end: Option<NaiveDate>,
    /// Weeks between backtest evaluation dates.
    pub interval_weeks: u32,
    /// Run the pullback detector on screened symbols.
    pub scan_pullbacks: bool,
    pub engine: EngineConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            benchmark: "SPY".into(),
            workers: 3,
            min_composite: 70.0,
            min_rs: 5.0,
            start: None,
            end: None,
            interval_weeks: 4,
            scan_pullbacks: true,
            engine: EngineConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_WORKERS).contains(&self.workers) {
            return Err(ConfigError::InvalidRange {
                field: "workers",
                reason: format!("expected 1..={MAX_WORKERS}, got {}", self.workers),
            });
        }
        if !(0.0..=100.0).contains(&self.min_composite) {
            return Err(ConfigError::InvalidRange {
                field: "min_composite",
                reason: format!("expected [0, 100], got {}", self.min_composite),
            });
        }
        if !(0.0..=100.0).contains(&self.min_rs) {
            return Err(ConfigError::InvalidRange {
                field: "min_rs",
                reason: format!("expected [0, 100], got {}", self.min_rs),
            });
        }
        if self.interval_weeks == 0 {
            return Err(ConfigError::NonPositive {
                field: "interval_weeks",
                value: 0.0,
            });
        }
        if self.benchmark.trim().is_empty() {
            return Err(ConfigError::InvalidRange {
                field: "benchmark",
                reason: "must name a symbol".into(),
            });
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(ConfigError::InvalidRange {
                    field: "start",
                    reason: format!("{start} is after end {end}"),
                });
            }
        }
        self.engine.validate()
    }

    /// Deterministic content hash, for naming run artefacts.
    pub fn run_id(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
