//! Engine configuration.
//!
//! A single immutable [`EngineConfig`] carries every tunable of the scoring
//! engine. `Default` yields the documented defaults; TOML files override only
//! the keys they name. Validation runs eagerly at load time and any violation
//! is a hard [`ConfigError`].

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Tolerance for "weights sum to 1" checks.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{section}: weights sum to {sum}, expected 1")]
    InvalidWeights { section: &'static str, sum: f64 },

    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} out of range: {reason}")]
    InvalidRange { field: &'static str, reason: String },

    #[error("parse engine config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("read engine config: {0}")]
    Io(#[from] std::io::Error),
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub rs: RsConfig,
    pub market: MarketConfig,
    pub current: CurrentEarningsConfig,
    pub annual: AnnualEarningsConfig,
    pub new_highs: NewHighsConfig,
    pub supply: SupplyConfig,
    pub institutional: InstitutionalConfig,
    pub composite: CompositeWeights,
    pub trend: TrendConfig,
    pub pullback: PullbackConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rs.validate()?;
        self.market.validate()?;
        self.current.validate()?;
        self.annual.validate()?;
        self.new_highs.validate()?;
        self.supply.validate()?;
        self.institutional.validate()?;
        self.composite.validate()?;
        self.trend.validate()?;
        self.pullback.validate()?;
        Ok(())
    }

    /// Content hash of the canonical JSON form.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

// ── Relative strength ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RsConfig {
    /// Trading days per quarter.
    pub quarter_length: usize,
    /// Weights for quarters, most recent first.
    pub quarter_weights: [f64; 4],
    /// Lowest RS a ranked symbol can receive.
    pub rs_min: f64,
    /// Width of the RS scale: ranked symbols land in `[rs_min, rs_min + rs_multiplier]`.
    pub rs_multiplier: f64,
    /// Fewer ranked symbols than this and every RS is 0.
    pub min_universe_size: usize,
}

impl Default for RsConfig {
    fn default() -> Self {
        Self {
            quarter_length: 65,
            quarter_weights: [0.40, 0.20, 0.20, 0.20],
            rs_min: 1.0,
            rs_multiplier: 98.0,
            min_universe_size: 10,
        }
    }
}

impl RsConfig {
    /// Bars required for a symbol to be ranked.
    pub fn required_history(&self) -> usize {
        4 * self.quarter_length
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive_count("rs.quarter_length", self.quarter_length)?;
        check_weights("rs.quarter_weights", &self.quarter_weights)?;
        non_negative("rs.rs_min", self.rs_min)?;
        positive("rs.rs_multiplier", self.rs_multiplier)?;
        positive_count("rs.min_universe_size", self.min_universe_size)
    }
}

// ── Market regime ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketConfig {
    /// Below this many bars the classifier returns the neutral snapshot.
    pub min_bars: usize,
    pub neutral_score: f64,
    pub ema_fast: usize,
    pub ema_mid: usize,
    pub ema_slow: usize,
    pub distribution_lookback: usize,
    /// Fractional decline (0.002 = 0.2%) that counts as distribution.
    pub distribution_min_decline: f64,
    pub max_distribution_days: usize,
    pub follow_through_window: usize,
    pub follow_through_min_day: usize,
    pub follow_through_min_gain: f64,
    /// A decline larger than this resets the rally counter.
    pub rally_reset_decline: f64,
    pub price_above_slow_weight: f64,
    pub ema_alignment_weight: f64,
    pub mid_rising_weight: f64,
    pub price_above_fast_weight: f64,
    pub mid_rising_lookback: usize,
    pub distribution_weight: f64,
    pub follow_through_weight: f64,
    pub bullish_threshold: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            min_bars: 50,
            neutral_score: 0.4,
            ema_fast: 21,
            ema_mid: 50,
            ema_slow: 200,
            distribution_lookback: 25,
            distribution_min_decline: 0.002,
            max_distribution_days: 5,
            follow_through_window: 30,
            follow_through_min_day: 4,
            follow_through_min_gain: 0.015,
            rally_reset_decline: 0.01,
            price_above_slow_weight: 0.45,
            ema_alignment_weight: 0.25,
            mid_rising_weight: 0.20,
            price_above_fast_weight: 0.10,
            mid_rising_lookback: 20,
            distribution_weight: 0.30,
            follow_through_weight: 0.15,
            bullish_threshold: 0.6,
        }
    }
}

impl MarketConfig {
    /// Weight left for the EMA trend score.
    pub fn trend_weight(&self) -> f64 {
        1.0 - self.distribution_weight - self.follow_through_weight
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive_count("market.min_bars", self.min_bars)?;
        fraction("market.neutral_score", self.neutral_score)?;
        positive_count("market.ema_fast", self.ema_fast)?;
        positive_count("market.ema_mid", self.ema_mid)?;
        positive_count("market.ema_slow", self.ema_slow)?;
        if !(self.ema_fast < self.ema_mid && self.ema_mid < self.ema_slow) {
            return Err(ConfigError::InvalidRange {
                field: "market.ema spans",
                reason: "expected ema_fast < ema_mid < ema_slow".into(),
            });
        }
        positive_count("market.distribution_lookback", self.distribution_lookback)?;
        positive("market.distribution_min_decline", self.distribution_min_decline)?;
        positive_count("market.max_distribution_days", self.max_distribution_days)?;
        positive_count("market.follow_through_window", self.follow_through_window)?;
        positive_count("market.follow_through_min_day", self.follow_through_min_day)?;
        positive("market.follow_through_min_gain", self.follow_through_min_gain)?;
        positive("market.rally_reset_decline", self.rally_reset_decline)?;
        positive_count("market.mid_rising_lookback", self.mid_rising_lookback)?;
        check_weights(
            "market trend bonuses",
            &[
                self.price_above_slow_weight,
                self.ema_alignment_weight,
                self.mid_rising_weight,
                self.price_above_fast_weight,
            ],
        )?;
        fraction("market.distribution_weight", self.distribution_weight)?;
        fraction("market.follow_through_weight", self.follow_through_weight)?;
        if self.trend_weight() < -WEIGHT_TOLERANCE {
            return Err(ConfigError::InvalidWeights {
                section: "market blend (distribution + follow-through)",
                sum: self.distribution_weight + self.follow_through_weight,
            });
        }
        fraction("market.bullish_threshold", self.bullish_threshold)
    }
}

// ── C: current quarterly earnings ────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurrentEarningsConfig {
    pub growth_target: f64,
    pub growth_weight: f64,
    pub consistency_weight: f64,
    pub acceleration_weight: f64,
    /// Quarters needed for the year-over-year path.
    pub min_quarters: usize,
    /// Recent YoY quarters checked for consistency and acceleration.
    pub consistency_quarters: usize,
}

impl Default for CurrentEarningsConfig {
    fn default() -> Self {
        Self {
            growth_target: 0.25,
            growth_weight: 0.60,
            consistency_weight: 0.20,
            acceleration_weight: 0.20,
            min_quarters: 5,
            consistency_quarters: 3,
        }
    }
}

impl CurrentEarningsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("current.growth_target", self.growth_target)?;
        check_weights(
            "current earnings blend",
            &[
                self.growth_weight,
                self.consistency_weight,
                self.acceleration_weight,
            ],
        )?;
        if self.min_quarters < 5 {
            return Err(ConfigError::InvalidRange {
                field: "current.min_quarters",
                reason: "year-over-year growth needs at least 5 quarters".into(),
            });
        }
        positive_count("current.consistency_quarters", self.consistency_quarters)
    }
}

// ── A: annual earnings ───────────────────────────────────────────────

/// Growth / consistency / ROE blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnualWeights {
    pub growth: f64,
    pub consistency: f64,
    pub roe: f64,
}

impl AnnualWeights {
    fn as_array(&self) -> [f64; 3] {
        [self.growth, self.consistency, self.roe]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnualEarningsConfig {
    pub growth_target: f64,
    pub roe_target: f64,
    /// Years of YoY growth needed for the full path.
    pub min_years: usize,
    pub full_weights: AnnualWeights,
    pub limited_weights: AnnualWeights,
    /// Multiplier (< 1) applied to limited-history scores.
    pub limited_history_discount: f64,
}

impl Default for AnnualEarningsConfig {
    fn default() -> Self {
        Self {
            growth_target: 0.25,
            roe_target: 0.17,
            min_years: 3,
            full_weights: AnnualWeights {
                growth: 0.50,
                consistency: 0.30,
                roe: 0.20,
            },
            limited_weights: AnnualWeights {
                growth: 0.60,
                consistency: 0.15,
                roe: 0.25,
            },
            limited_history_discount: 0.85,
        }
    }
}

impl AnnualEarningsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("annual.growth_target", self.growth_target)?;
        positive("annual.roe_target", self.roe_target)?;
        positive_count("annual.min_years", self.min_years)?;
        check_weights("annual full-path weights", &self.full_weights.as_array())?;
        check_weights("annual limited-path weights", &self.limited_weights.as_array())?;
        if !(self.limited_history_discount > 0.0 && self.limited_history_discount < 1.0) {
            return Err(ConfigError::InvalidRange {
                field: "annual.limited_history_discount",
                reason: format!("expected (0, 1), got {}", self.limited_history_discount),
            });
        }
        Ok(())
    }
}

// ── N: new highs / new products ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewHighsConfig {
    pub revenue_growth_target: f64,
    pub revenue_weight: f64,
    pub proximity_weight: f64,
    /// Bars defining the 52-week high.
    pub high_lookback: usize,
    /// At or above this proximity the curve gives full credit.
    pub full_credit_proximity: f64,
    pub upper_tier_floor: f64,
    pub lower_tier_floor: f64,
    /// Maximum credit in the lower tier.
    pub lower_tier_max: f64,
}

impl Default for NewHighsConfig {
    fn default() -> Self {
        Self {
            revenue_growth_target: 0.25,
            revenue_weight: 0.5,
            proximity_weight: 0.5,
            high_lookback: 252,
            full_credit_proximity: 0.98,
            upper_tier_floor: 0.90,
            lower_tier_floor: 0.75,
            lower_tier_max: 0.3,
        }
    }
}

impl NewHighsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("new_highs.revenue_growth_target", self.revenue_growth_target)?;
        check_weights(
            "new_highs blend",
            &[self.revenue_weight, self.proximity_weight],
        )?;
        positive_count("new_highs.high_lookback", self.high_lookback)?;
        increasing(
            "new_highs proximity tiers",
            &[
                0.0,
                self.lower_tier_floor,
                self.upper_tier_floor,
                self.full_credit_proximity,
            ],
        )?;
        fraction("new_highs.full_credit_proximity", self.full_credit_proximity)?;
        fraction("new_highs.lower_tier_max", self.lower_tier_max)
    }
}

// ── S: supply and demand ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SupplyConfig {
    /// Share-count upper edges of the first four float bands.
    pub float_band_edges: [f64; 4],
    /// Score per band, smallest float first.
    pub float_band_scores: [f64; 5],
    pub missing_float_score: f64,
    pub average_volume_window: usize,
    pub up_down_window: usize,
    pub up_down_ratio_cap: f64,
    pub surge_window: usize,
    pub surge_multiplier: f64,
    pub breakout_threshold: f64,
    /// Open-over-prior-close gap that counts as a power gap.
    pub gap_threshold: f64,
    pub gap_volume_multiple: f64,
    pub gap_lookback: usize,
    pub float_weight: f64,
    pub up_down_weight: f64,
    pub surge_breakout_weight: f64,
    pub power_gap_weight: f64,
}

impl Default for SupplyConfig {
    fn default() -> Self {
        Self {
            float_band_edges: [25e6, 100e6, 500e6, 2e9],
            float_band_scores: [1.0, 0.8, 0.6, 0.4, 0.2],
            missing_float_score: 0.5,
            average_volume_window: 50,
            up_down_window: 50,
            up_down_ratio_cap: 2.0,
            surge_window: 5,
            surge_multiplier: 1.5,
            breakout_threshold: 0.98,
            gap_threshold: 0.04,
            gap_volume_multiple: 2.0,
            gap_lookback: 20,
            float_weight: 0.25,
            up_down_weight: 0.25,
            surge_breakout_weight: 0.30,
            power_gap_weight: 0.20,
        }
    }
}

impl SupplyConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        increasing("supply.float_band_edges", &self.float_band_edges)?;
        positive("supply.float_band_edges[0]", self.float_band_edges[0])?;
        for score in self.float_band_scores {
            fraction("supply.float_band_scores", score)?;
        }
        fraction("supply.missing_float_score", self.missing_float_score)?;
        positive_count("supply.average_volume_window", self.average_volume_window)?;
        positive_count("supply.up_down_window", self.up_down_window)?;
        positive("supply.up_down_ratio_cap", self.up_down_ratio_cap)?;
        positive_count("supply.surge_window", self.surge_window)?;
        positive("supply.surge_multiplier", self.surge_multiplier)?;
        positive("supply.breakout_threshold", self.breakout_threshold)?;
        positive("supply.gap_threshold", self.gap_threshold)?;
        positive("supply.gap_volume_multiple", self.gap_volume_multiple)?;
        positive_count("supply.gap_lookback", self.gap_lookback)?;
        check_weights(
            "supply blend",
            &[
                self.float_weight,
                self.up_down_weight,
                self.surge_breakout_weight,
                self.power_gap_weight,
            ],
        )
    }
}

// ── I: institutional sponsorship ─────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstitutionalConfig {
    /// Ownership fractions where the curve changes slope:
    /// ramp end, ideal start, ideal end, gentle decay end, steep decay end.
    pub band_edges: [f64; 5],
    /// Curve value at the end of the initial ramp.
    pub ramp_score: f64,
    /// Curve value across the ideal band.
    pub ideal_score: f64,
    /// Curve value at the end of the gentle decay.
    pub decay_score: f64,
    /// Curve value at and beyond the end of the steep decay.
    pub floor_score: f64,
    pub ownership_weight: f64,
    pub holder_trend_weight: f64,
    /// Score when no ownership data is available.
    pub missing_score: f64,
    /// QoQ holder-count change edges: strong increase, increase, decrease, significant decrease.
    pub holder_trend_edges: [f64; 4],
    /// Trend score per band, strong increase first.
    pub holder_trend_scores: [f64; 5],
    pub missing_trend_score: f64,
}

impl Default for InstitutionalConfig {
    fn default() -> Self {
        Self {
            band_edges: [0.10, 0.30, 0.60, 0.80, 0.90],
            ramp_score: 0.2,
            ideal_score: 1.0,
            decay_score: 0.8,
            floor_score: 0.4,
            ownership_weight: 0.6,
            holder_trend_weight: 0.4,
            missing_score: 0.1,
            holder_trend_edges: [0.10, 0.03, -0.03, -0.10],
            holder_trend_scores: [1.0, 0.75, 0.5, 0.25, 0.0],
            missing_trend_score: 0.5,
        }
    }
}

impl InstitutionalConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        increasing("institutional.band_edges", &self.band_edges)?;
        positive("institutional.band_edges[0]", self.band_edges[0])?;
        fraction("institutional.band_edges[4]", self.band_edges[4])?;
        for (field, v) in [
            ("institutional.ramp_score", self.ramp_score),
            ("institutional.ideal_score", self.ideal_score),
            ("institutional.decay_score", self.decay_score),
            ("institutional.floor_score", self.floor_score),
            ("institutional.missing_score", self.missing_score),
            ("institutional.missing_trend_score", self.missing_trend_score),
        ] {
            fraction(field, v)?;
        }
        check_weights(
            "institutional blend",
            &[self.ownership_weight, self.holder_trend_weight],
        )?;
        let mut descending = self.holder_trend_edges;
        descending.reverse();
        increasing("institutional.holder_trend_edges (descending)", &descending)?;
        for score in self.holder_trend_scores {
            fraction("institutional.holder_trend_scores", score)?;
        }
        Ok(())
    }
}

// ── Composite ────────────────────────────────────────────────────────

/// Weights of the seven components in the full composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositeWeights {
    pub c: f64,
    pub a: f64,
    pub n: f64,
    pub s: f64,
    pub l: f64,
    pub i: f64,
    pub m: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            c: 0.20,
            a: 0.15,
            n: 0.10,
            s: 0.10,
            l: 0.20,
            i: 0.10,
            m: 0.15,
        }
    }
}

impl CompositeWeights {
    pub fn sum(&self) -> f64 {
        self.c + self.a + self.n + self.s + self.l + self.i + self.m
    }

    /// Weights for the degraded path: C and A dropped, the rest renormalised to 1.
    pub fn degraded(&self) -> CompositeWeights {
        let technical = self.n + self.s + self.l + self.i + self.m;
        CompositeWeights {
            c: 0.0,
            a: 0.0,
            n: self.n / technical,
            s: self.s / technical,
            l: self.l / technical,
            i: self.i / technical,
            m: self.m / technical,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_weights(
            "composite weights",
            &[self.c, self.a, self.n, self.s, self.l, self.i, self.m],
        )?;
        let technical = self.n + self.s + self.l + self.i + self.m;
        if technical <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "composite technical weights (n+s+l+i+m)",
                value: technical,
            });
        }
        Ok(())
    }
}

// ── Trend qualification ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrendConfig {
    pub window: usize,
    pub fast_ema: usize,
    pub slow_ema: usize,
    /// Fraction of bars above the fast EMA that qualifies.
    pub fast_adherence: f64,
    /// Fraction of bars above the slow EMA that qualifies.
    pub slow_adherence: f64,
    pub segments: usize,
    /// Consecutive non-decreasing segments needed for higher highs / lows.
    pub min_rising_segments: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window: 60,
            fast_ema: 8,
            slow_ema: 21,
            fast_adherence: 0.70,
            slow_adherence: 0.80,
            segments: 4,
            min_rising_segments: 3,
        }
    }
}

impl TrendConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive_count("trend.fast_ema", self.fast_ema)?;
        if self.slow_ema <= self.fast_ema {
            return Err(ConfigError::InvalidRange {
                field: "trend.slow_ema",
                reason: "must exceed trend.fast_ema".into(),
            });
        }
        fraction("trend.fast_adherence", self.fast_adherence)?;
        fraction("trend.slow_adherence", self.slow_adherence)?;
        positive_count("trend.segments", self.segments)?;
        if self.min_rising_segments < 2 || self.min_rising_segments > self.segments {
            return Err(ConfigError::InvalidRange {
                field: "trend.min_rising_segments",
                reason: format!("expected 2..={}", self.segments),
            });
        }
        if self.window < self.segments {
            return Err(ConfigError::InvalidRange {
                field: "trend.window",
                reason: "must cover at least one bar per segment".into(),
            });
        }
        Ok(())
    }
}

// ── Pullback entries ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PullbackConfig {
    /// Prior bars examined for each scanned bar.
    pub lookback: usize,
    /// Bars scanned beyond the lookback context.
    pub context: usize,
    /// Max |distance| to the fast EMA, in percent.
    pub fast_tolerance_pct: f64,
    /// Max |distance| to the slow EMA, in percent.
    pub slow_tolerance_pct: f64,
    pub fast_prior_above: f64,
    pub slow_prior_above: f64,
    pub reclaim_lookback: usize,
    pub rsi_period: usize,
}

impl Default for PullbackConfig {
    fn default() -> Self {
        Self {
            lookback: 10,
            context: 5,
            fast_tolerance_pct: 2.0,
            slow_tolerance_pct: 3.0,
            fast_prior_above: 0.70,
            slow_prior_above: 0.80,
            reclaim_lookback: 5,
            rsi_period: 14,
        }
    }
}

impl PullbackConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive_count("pullback.lookback", self.lookback)?;
        positive_count("pullback.context", self.context)?;
        positive("pullback.fast_tolerance_pct", self.fast_tolerance_pct)?;
        positive("pullback.slow_tolerance_pct", self.slow_tolerance_pct)?;
        fraction("pullback.fast_prior_above", self.fast_prior_above)?;
        fraction("pullback.slow_prior_above", self.slow_prior_above)?;
        positive_count("pullback.reclaim_lookback", self.reclaim_lookback)?;
        if self.reclaim_lookback > self.lookback {
            return Err(ConfigError::InvalidRange {
                field: "pullback.reclaim_lookback",
                reason: "cannot exceed pullback.lookback".into(),
            });
        }
        positive_count("pullback.rsi_period", self.rsi_period)
    }
}

// ── Validation helpers ───────────────────────────────────────────────

fn check_weights(section: &'static str, weights: &[f64]) -> Result<(), ConfigError> {
    let sum: f64 = weights.iter().sum();
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0)
        || (sum - 1.0).abs() > WEIGHT_TOLERANCE
    {
        return Err(ConfigError::InvalidWeights { section, sum });
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange {
            field,
            reason: format!("expected >= 0, got {value}"),
        })
    }
}

fn positive_count(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value: 0.0 })
    }
}

fn fraction(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange {
            field,
            reason: format!("expected [0, 1], got {value}"),
        })
    }
}

fn increasing(field: &'static str, values: &[f64]) -> Result<(), ConfigError> {
    if values.windows(2).all(|w| w[0] < w[1]) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange {
            field,
            reason: format!("expected strictly increasing values, got {values:?}"),
        })
    }
}
