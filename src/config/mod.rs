//! Configuration management for the analytics engine
//!
//! All tunable constants of the core formulas live here as named,
//! documented fields so callers never depend on magic numbers buried in
//! the analyzers. Configuration loads from environment variables or a
//! TOML file and is validated before use.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Metric aggregation configuration
    pub aggregate: AggregateConfig,

    /// Trend prediction configuration
    pub predictor: PredictorConfig,

    /// Category relationship configuration
    pub category: CategoryConfig,

    /// Engagement scoring configuration
    pub engagement: EngagementConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Aggregation-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    /// Number of top hashtags reported per aggregate group
    pub top_hashtags: usize,
}

/// Trend prediction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Fraction of the growth rate applied to the current share when
    /// projecting the next period
    pub smoothing_factor: f64,

    /// Denominator floor for growth-rate division (guards prior share = 0)
    pub epsilon: f64,

    /// Cap on the relative growth rate; a zero prior share would otherwise
    /// produce an unbounded rate
    pub max_growth_rate: f64,

    /// Fixed confidence assigned when fewer than two periods are available
    pub min_confidence: f64,

    /// Number of historical periods at which the history component of
    /// confidence saturates to 1.0
    pub saturation_periods: usize,
}

/// Category relationship and emergence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// A category counts as "trending" in a period when it ranks in the
    /// top-K by views for that period
    pub trending_top_k: usize,

    /// Minimum relation score for a pair to count as strongly related
    pub strong_relation_threshold: f64,

    /// Minimum relative share growth for a category to count as emerging
    pub emerging_growth_threshold: f64,

    /// Minimum latest-period views for emergence; excludes near-zero-volume
    /// noise like a category growing from 2 to 3 views
    pub min_emerging_volume: u64,

    /// View volume at which the volume component of emergence confidence
    /// saturates to 1.0
    pub volume_saturation: f64,

    /// Relative growth at which the growth component of emergence
    /// confidence saturates to 1.0 (2.0 means +200%)
    pub growth_saturation: f64,

    /// Weight of the growth component in emergence confidence
    pub emerging_growth_weight: f64,

    /// Weight of the volume component in emergence confidence
    pub emerging_volume_weight: f64,
}

/// Engagement scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementConfig {
    /// Weight of the share-velocity proxy (comments/likes ratio) in viral
    /// potential
    pub viral_velocity_weight: f64,

    /// Weight of absolute reach (views) in viral potential
    pub viral_reach_weight: f64,

    /// View count at which the reach component saturates to 1.0
    pub reach_saturation: f64,

    /// Number of items reported in the viral-content listing
    pub viral_top_n: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self { top_hashtags: 10 }
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.3,
            epsilon: 1e-6,
            max_growth_rate: 10.0,
            min_confidence: 0.3,
            saturation_periods: 8,
        }
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            trending_top_k: 10,
            strong_relation_threshold: 0.5,
            emerging_growth_threshold: 0.5,
            min_emerging_volume: 10_000,
            volume_saturation: 1_000_000.0,
            growth_saturation: 2.0,
            emerging_growth_weight: 0.6,
            emerging_volume_weight: 0.4,
        }
    }
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            viral_velocity_weight: 0.6,
            viral_reach_weight: 0.4,
            reach_saturation: 10_000_000.0,
            viral_top_n: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            aggregate: AggregateConfig::default(),
            predictor: PredictorConfig::default(),
            category: CategoryConfig::default(),
            engagement: EngagementConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl AnalyticsConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            aggregate: AggregateConfig {
                top_hashtags: env_parse("TRENDLENS_TOP_HASHTAGS", defaults.aggregate.top_hashtags),
            },
            predictor: PredictorConfig {
                smoothing_factor: env_parse(
                    "TRENDLENS_SMOOTHING_FACTOR",
                    defaults.predictor.smoothing_factor,
                ),
                epsilon: env_parse("TRENDLENS_EPSILON", defaults.predictor.epsilon),
                max_growth_rate: env_parse(
                    "TRENDLENS_MAX_GROWTH_RATE",
                    defaults.predictor.max_growth_rate,
                ),
                min_confidence: env_parse(
                    "TRENDLENS_MIN_CONFIDENCE",
                    defaults.predictor.min_confidence,
                ),
                saturation_periods: env_parse(
                    "TRENDLENS_SATURATION_PERIODS",
                    defaults.predictor.saturation_periods,
                ),
            },
            category: CategoryConfig {
                trending_top_k: env_parse(
                    "TRENDLENS_TRENDING_TOP_K",
                    defaults.category.trending_top_k,
                ),
                strong_relation_threshold: env_parse(
                    "TRENDLENS_STRONG_RELATION_THRESHOLD",
                    defaults.category.strong_relation_threshold,
                ),
                emerging_growth_threshold: env_parse(
                    "TRENDLENS_EMERGING_GROWTH_THRESHOLD",
                    defaults.category.emerging_growth_threshold,
                ),
                min_emerging_volume: env_parse(
                    "TRENDLENS_MIN_EMERGING_VOLUME",
                    defaults.category.min_emerging_volume,
                ),
                volume_saturation: env_parse(
                    "TRENDLENS_VOLUME_SATURATION",
                    defaults.category.volume_saturation,
                ),
                growth_saturation: env_parse(
                    "TRENDLENS_GROWTH_SATURATION",
                    defaults.category.growth_saturation,
                ),
                emerging_growth_weight: env_parse(
                    "TRENDLENS_EMERGING_GROWTH_WEIGHT",
                    defaults.category.emerging_growth_weight,
                ),
                emerging_volume_weight: env_parse(
                    "TRENDLENS_EMERGING_VOLUME_WEIGHT",
                    defaults.category.emerging_volume_weight,
                ),
            },
            engagement: EngagementConfig {
                viral_velocity_weight: env_parse(
                    "TRENDLENS_VIRAL_VELOCITY_WEIGHT",
                    defaults.engagement.viral_velocity_weight,
                ),
                viral_reach_weight: env_parse(
                    "TRENDLENS_VIRAL_REACH_WEIGHT",
                    defaults.engagement.viral_reach_weight,
                ),
                reach_saturation: env_parse(
                    "TRENDLENS_REACH_SATURATION",
                    defaults.engagement.reach_saturation,
                ),
                viral_top_n: env_parse("TRENDLENS_VIRAL_TOP_N", defaults.engagement.viral_top_n),
            },
            logging: LoggingConfig {
                level: std::env::var("TRENDLENS_LOG_LEVEL")
                    .unwrap_or_else(|_| defaults.logging.level),
                format: std::env::var("TRENDLENS_LOG_FORMAT")
                    .unwrap_or_else(|_| defaults.logging.format),
            },
        };

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.aggregate.top_hashtags == 0 {
            anyhow::bail!("top_hashtags must be greater than 0");
        }

        if self.predictor.epsilon <= 0.0 {
            anyhow::bail!("epsilon must be positive");
        }

        if self.predictor.max_growth_rate <= 0.0 {
            anyhow::bail!("max_growth_rate must be positive");
        }

        if !(0.0..=1.0).contains(&self.predictor.min_confidence) {
            anyhow::bail!("min_confidence must be within [0, 1]");
        }

        if self.predictor.saturation_periods == 0 {
            anyhow::bail!("saturation_periods must be greater than 0");
        }

        if self.category.trending_top_k == 0 {
            anyhow::bail!("trending_top_k must be greater than 0");
        }

        if !(0.0..=1.0).contains(&self.category.strong_relation_threshold) {
            anyhow::bail!("strong_relation_threshold must be within [0, 1]");
        }

        if self.category.volume_saturation <= 0.0 {
            anyhow::bail!("volume_saturation must be positive");
        }

        if self.category.growth_saturation <= 0.0 {
            anyhow::bail!("growth_saturation must be positive");
        }

        let emerging_sum =
            self.category.emerging_growth_weight + self.category.emerging_volume_weight;
        if (emerging_sum - 1.0).abs() > 1e-9 {
            anyhow::bail!("emergence confidence weights must sum to 1.0, got {emerging_sum}");
        }

        let weight_sum = self.engagement.viral_velocity_weight + self.engagement.viral_reach_weight;
        if (weight_sum - 1.0).abs() > 1e-9 {
            anyhow::bail!("viral potential weights must sum to 1.0, got {weight_sum}");
        }

        if self.engagement.reach_saturation <= 0.0 {
            anyhow::bail!("reach_saturation must be positive");
        }

        Ok(())
    }
}
