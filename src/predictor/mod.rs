//! Trend prediction over aggregated period metrics
//!
//! This module turns per-category period aggregates into forward
//! projections:
//! - Current trend = a category's share of platform views in the latest period
//! - Growth rate = relative share change across the two most recent periods
//! - Predicted trend = smoothed projection of the share, clamped to [0, 1]
//! - Confidence = history depth combined with growth-direction consistency
//!
//! Empty history is never an error: predictions degrade to an empty report
//! with zero accuracy, and a single period yields a fixed low confidence.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

use crate::aggregate::{PeriodAggregate, PeriodType};
use crate::config::PredictorConfig;
use crate::models::{Platform, Season};

/// Errors that can occur during trend prediction
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Aggregate missing category label for period {period}")]
    MissingCategory { period: String },

    #[error("Internal computation error in {operation}: {detail}")]
    Internal { operation: String, detail: String },
}

/// Result type for prediction operations
pub type PredictResult<T> = Result<T, PredictError>;

/// A confidence-scored forward projection for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPrediction {
    pub category: String,
    pub platform: Option<Platform>,
    /// Share of platform views in the latest period, [0, 1]
    pub current_trend: f64,
    /// Projected share for the next period, [0, 1]
    pub predicted_trend: f64,
    /// Evidence strength behind the projection, [0, 1]
    pub confidence: f64,
    /// Deterministic, rule-based description of prediction drivers
    pub factors: Vec<String>,
    pub timeframe: String,
}

/// Predictions for a platform plus their aggregate accuracy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    pub predictions: Vec<TrendPrediction>,
    /// Mean of per-category confidences; 0.0 when no predictions exist
    pub accuracy: f64,
}

impl PredictionReport {
    fn empty() -> Self {
        Self {
            predictions: Vec::new(),
            accuracy: 0.0,
        }
    }
}

/// How monthly periods are bucketed for history building
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucketing {
    Calendar,
    Seasonal,
}

/// Ordered key for one share-history bucket (a week, month or season)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Bucket {
    Period { year: u16, number: u16 },
    Season { year: u16, season: Season },
}

/// Per-category share history across chronologically ordered buckets
type ShareHistory = BTreeMap<String, Vec<f64>>;

/// Trend predictor operating on pre-aggregated period metrics
#[derive(Debug, Clone)]
pub struct TrendPredictor {
    config: PredictorConfig,
}

impl TrendPredictor {
    /// Create a predictor with the given configuration
    pub fn new(config: PredictorConfig) -> Self {
        Self { config }
    }

    /// Create a predictor with default configuration
    pub fn with_defaults() -> Self {
        Self::new(PredictorConfig::default())
    }

    /// Predict weekly category trends for a platform
    ///
    /// # Arguments
    /// * `aggregates` - Period aggregates grouped by platform and category
    /// * `platform` - Restrict to one platform, or None for all combined
    pub fn predict_weekly(
        &self,
        aggregates: &[PeriodAggregate],
        platform: Option<Platform>,
    ) -> PredictResult<PredictionReport> {
        let history = self.share_history(aggregates, platform, PeriodType::Week, Bucketing::Calendar)?;
        self.project(history, platform, "weekly", &[])
    }

    /// Predict monthly category trends for a platform
    pub fn predict_monthly(
        &self,
        aggregates: &[PeriodAggregate],
        platform: Option<Platform>,
    ) -> PredictResult<PredictionReport> {
        let history = self.share_history(aggregates, platform, PeriodType::Month, Bucketing::Calendar)?;
        self.project(history, platform, "monthly", &[])
    }

    /// Predict seasonal category trends for a platform
    ///
    /// Monthly aggregates are bucketed into the four fixed seasons
    /// (spring 3-5, summer 6-8, autumn 9-11, winter 12/1/2). The reference
    /// time determines the current and upcoming season named in the factor
    /// list; it is an explicit parameter so results stay deterministic.
    pub fn predict_seasonal(
        &self,
        aggregates: &[PeriodAggregate],
        platform: Option<Platform>,
        reference: DateTime<Utc>,
    ) -> PredictResult<PredictionReport> {
        let history =
            self.share_history(aggregates, platform, PeriodType::Month, Bucketing::Seasonal)?;

        let month = reference.month() as u8;
        let season_factors = match Season::from_month(month) {
            Some(current) => vec![
                format!("current season: {current}"),
                format!("upcoming season: {}", current.next()),
            ],
            None => Vec::new(),
        };

        self.project(history, platform, "seasonal", &season_factors)
    }

    /// Build per-category share series over chronologically ordered buckets
    ///
    /// Categories absent from a bucket get share 0.0 so every series has the
    /// same length as the bucket list.
    fn share_history(
        &self,
        aggregates: &[PeriodAggregate],
        platform: Option<Platform>,
        period_type: PeriodType,
        bucketing: Bucketing,
    ) -> PredictResult<ShareHistory> {
        let mut views: BTreeMap<(Bucket, String), u64> = BTreeMap::new();
        let mut buckets: BTreeSet<Bucket> = BTreeSet::new();
        let mut categories: BTreeSet<String> = BTreeSet::new();

        for agg in aggregates {
            if agg.period.period_type != period_type {
                continue;
            }
            if platform.is_some() && agg.platform != platform {
                continue;
            }

            let category = agg.category.clone().ok_or_else(|| {
                PredictError::MissingCategory {
                    period: agg.period.to_string(),
                }
            })?;

            let bucket = if bucketing == Bucketing::Seasonal {
                let month = agg.period.number as u8;
                let Some(season) = Season::from_month(month) else {
                    return Err(PredictError::Internal {
                        operation: "share_history".to_string(),
                        detail: format!("month {month} outside 1-12 after validation"),
                    });
                };
                // December belongs to the winter that ends in the next year
                let year = if month == 12 {
                    agg.period.year + 1
                } else {
                    agg.period.year
                };
                Bucket::Season { year, season }
            } else {
                Bucket::Period {
                    year: agg.period.year,
                    number: agg.period.number,
                }
            };

            *views.entry((bucket, category.clone())).or_insert(0) += agg.total_views;
            buckets.insert(bucket);
            categories.insert(category);
        }

        // Per-bucket platform totals for share normalization
        let mut totals: BTreeMap<Bucket, u64> = BTreeMap::new();
        for ((bucket, _), v) in &views {
            *totals.entry(*bucket).or_insert(0) += v;
        }

        let mut history: ShareHistory = BTreeMap::new();
        for category in &categories {
            let series: Vec<f64> = buckets
                .iter()
                .map(|bucket| {
                    let total = totals.get(bucket).copied().unwrap_or(0);
                    if total == 0 {
                        0.0
                    } else {
                        let v = views
                            .get(&(*bucket, category.clone()))
                            .copied()
                            .unwrap_or(0);
                        v as f64 / total as f64
                    }
                })
                .collect();
            history.insert(category.clone(), series);
        }

        Ok(history)
    }

    /// Project each category's share series forward one bucket
    fn project(
        &self,
        history: ShareHistory,
        platform: Option<Platform>,
        timeframe: &str,
        extra_factors: &[String],
    ) -> PredictResult<PredictionReport> {
        if history.is_empty() {
            debug!(timeframe, "no history available, returning empty report");
            return Ok(PredictionReport::empty());
        }

        let mut predictions = Vec::with_capacity(history.len());

        for (category, shares) in history {
            let Some(&current) = shares.last() else {
                return Err(PredictError::Internal {
                    operation: "project".to_string(),
                    detail: format!("empty share series for category {category}"),
                });
            };

            let growth = self.growth_rate(&shares);
            let predicted = (current + growth * self.config.smoothing_factor).clamp(0.0, 1.0);
            let confidence = self.confidence(&shares);

            let mut factors = self.factors(&shares, growth);
            factors.extend(extra_factors.iter().cloned());

            predictions.push(TrendPrediction {
                category,
                platform,
                current_trend: current,
                predicted_trend: predicted,
                confidence,
                factors,
                timeframe: timeframe.to_string(),
            });
        }

        let accuracy = predictions.iter().map(|p| p.confidence).sum::<f64>()
            / predictions.len() as f64;

        debug!(
            timeframe,
            predictions = predictions.len(),
            accuracy,
            "trend projection complete"
        );

        Ok(PredictionReport {
            predictions,
            accuracy,
        })
    }

    /// Relative share change over the two most recent buckets, capped
    fn growth_rate(&self, shares: &[f64]) -> f64 {
        if shares.len() < 2 {
            return 0.0;
        }

        let latest = shares[shares.len() - 1];
        let prior = shares[shares.len() - 2];
        let rate = (latest - prior) / prior.max(self.config.epsilon);
        rate.clamp(-self.config.max_growth_rate, self.config.max_growth_rate)
    }

    /// Confidence from history depth and growth-direction consistency
    ///
    /// Fewer than two buckets yields the fixed `min_confidence` floor. With
    /// more history, half the score comes from how many buckets exist
    /// (saturating at `saturation_periods`) and half from the fraction of
    /// consecutive share deltas agreeing with the majority direction.
    fn confidence(&self, shares: &[f64]) -> f64 {
        if shares.len() < 2 {
            return self.config.min_confidence;
        }

        let depth = (shares.len() as f64 / self.config.saturation_periods as f64).min(1.0);

        let deltas: Vec<f64> = shares.windows(2).map(|w| w[1] - w[0]).collect();
        let rising = deltas.iter().filter(|&&d| d >= 0.0).count();
        let falling = deltas.len() - rising;
        let agreement = rising.max(falling) as f64 / deltas.len() as f64;

        (0.5 * depth + 0.5 * agreement).clamp(0.0, 1.0)
    }

    /// Rule-based, deterministic factor tags for a prediction
    fn factors(&self, shares: &[f64], growth: f64) -> Vec<String> {
        let mut factors = Vec::new();

        if shares.len() < 2 {
            factors.push("limited history".to_string());
            return factors;
        }

        let deltas: Vec<f64> = shares.windows(2).map(|w| w[1] - w[0]).collect();
        let rising = deltas.iter().filter(|&&d| d >= 0.0).count();
        let agreement = rising.max(deltas.len() - rising) as f64 / deltas.len() as f64;

        if growth >= 1.0 {
            factors.push("high-volume spike".to_string());
        } else if growth >= 0.25 && agreement >= 0.75 {
            factors.push("consistent growth".to_string());
        } else if growth >= 0.25 {
            factors.push("recent acceleration".to_string());
        } else if growth <= -0.25 {
            factors.push("declining interest".to_string());
        } else {
            factors.push("stable share".to_string());
        }

        // Flag noisy histories: standard deviation large relative to mean share
        if shares.len() >= 3 {
            let mean = shares.iter().copied().mean();
            let std_dev = shares.iter().copied().std_dev();
            if mean > 0.0 && std_dev / mean > 0.5 {
                factors.push("volatile history".to_string());
            }
        }

        factors
    }
}

impl Default for TrendPredictor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::PeriodKey;

    fn agg(category: &str, views: u64, week: u16) -> PeriodAggregate {
        PeriodAggregate {
            period: PeriodKey {
                period_type: PeriodType::Week,
                year: 2025,
                number: week,
            },
            platform: Some(Platform::Youtube),
            category: Some(category.to_string()),
            count: 1,
            total_views: views,
            total_likes: 0,
            total_comments: 0,
            avg_views: views as f64,
            top_hashtags: vec![],
        }
    }

    fn month_agg(category: &str, views: u64, month: u16, year: u16) -> PeriodAggregate {
        PeriodAggregate {
            period: PeriodKey {
                period_type: PeriodType::Month,
                year,
                number: month,
            },
            platform: Some(Platform::Youtube),
            category: Some(category.to_string()),
            count: 1,
            total_views: views,
            total_likes: 0,
            total_comments: 0,
            avg_views: views as f64,
            top_hashtags: vec![],
        }
    }

    #[test]
    fn test_empty_input_gives_empty_report() {
        let predictor = TrendPredictor::with_defaults();
        let report = predictor
            .predict_weekly(&[], Some(Platform::Youtube))
            .unwrap();
        assert!(report.predictions.is_empty());
        assert_eq!(report.accuracy, 0.0);
    }

    #[test]
    fn test_single_category_growth() {
        // Gaming is the only category: share is 1.0 in both periods, so share
        // growth is 0 even though raw views grew 1000 -> 1500.
        let predictor = TrendPredictor::with_defaults();
        let aggregates = vec![agg("gaming", 1000, 10), agg("gaming", 1500, 11)];

        let report = predictor
            .predict_weekly(&aggregates, Some(Platform::Youtube))
            .unwrap();
        assert_eq!(report.predictions.len(), 1);

        let p = &report.predictions[0];
        assert!((p.current_trend - 1.0).abs() < 1e-9);
        assert!((p.predicted_trend - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_share_growth_against_stable_competitor() {
        // Gaming 1000 -> 1500 against a stable 1000-view competitor:
        // shares 0.5 -> 0.6, growth = 0.2, prediction rises but stays <= 1.
        let predictor = TrendPredictor::with_defaults();
        let aggregates = vec![
            agg("gaming", 1000, 10),
            agg("music", 1000, 10),
            agg("gaming", 1500, 11),
            agg("music", 1000, 11),
        ];

        let report = predictor
            .predict_weekly(&aggregates, Some(Platform::Youtube))
            .unwrap();
        let gaming = report
            .predictions
            .iter()
            .find(|p| p.category == "gaming")
            .unwrap();

        assert!((gaming.current_trend - 0.6).abs() < 1e-9);
        assert!(gaming.predicted_trend > gaming.current_trend);
        assert!(gaming.predicted_trend <= 1.0);
    }

    #[test]
    fn test_constant_total_volume_reduces_to_view_growth() {
        // With the platform total fixed at 3000 views in both weeks, share
        // growth equals raw view growth: gaming 1000 -> 1500 is +50%, so
        // growth = 0.5 and the projection is 0.5 + 0.5 * 0.3 = 0.65.
        let predictor = TrendPredictor::with_defaults();
        let aggregates = vec![
            agg("gaming", 1000, 10),
            agg("other", 2000, 10),
            agg("gaming", 1500, 11),
            agg("other", 1500, 11),
        ];

        let report = predictor
            .predict_weekly(&aggregates, Some(Platform::Youtube))
            .unwrap();
        let gaming = report
            .predictions
            .iter()
            .find(|p| p.category == "gaming")
            .unwrap();

        assert!((gaming.current_trend - 0.5).abs() < 1e-9);
        assert!((gaming.predicted_trend - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_shares_sum_to_one() {
        let predictor = TrendPredictor::with_defaults();
        let aggregates = vec![
            agg("gaming", 300, 10),
            agg("music", 500, 10),
            agg("news", 200, 10),
        ];

        let report = predictor
            .predict_weekly(&aggregates, Some(Platform::Youtube))
            .unwrap();
        let sum: f64 = report.predictions.iter().map(|p| p.current_trend).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_prior_share_is_capped() {
        // Category appearing from nothing: prior share 0 would explode the
        // growth rate without the epsilon floor and cap.
        let predictor = TrendPredictor::with_defaults();
        let aggregates = vec![
            agg("music", 1000, 10),
            agg("music", 1000, 11),
            agg("gaming", 500, 11),
        ];

        let report = predictor
            .predict_weekly(&aggregates, Some(Platform::Youtube))
            .unwrap();
        let gaming = report
            .predictions
            .iter()
            .find(|p| p.category == "gaming")
            .unwrap();

        assert!(gaming.predicted_trend >= 0.0);
        assert!(gaming.predicted_trend <= 1.0);
        assert!(gaming.confidence >= 0.0 && gaming.confidence <= 1.0);
    }

    #[test]
    fn test_single_period_low_confidence() {
        let predictor = TrendPredictor::with_defaults();
        let aggregates = vec![agg("gaming", 1000, 10)];

        let report = predictor
            .predict_weekly(&aggregates, Some(Platform::Youtube))
            .unwrap();
        assert_eq!(report.predictions[0].confidence, 0.3);
        assert_eq!(report.predictions[0].factors, vec!["limited history"]);
    }

    #[test]
    fn test_confidence_grows_with_history() {
        let predictor = TrendPredictor::with_defaults();

        let short: Vec<_> = (10..12).map(|w| agg("gaming", 1000 + w as u64, w)).collect();
        let long: Vec<_> = (5..13).map(|w| agg("gaming", 1000 + w as u64, w)).collect();

        let short_conf = predictor
            .predict_weekly(&short, Some(Platform::Youtube))
            .unwrap()
            .predictions[0]
            .confidence;
        let long_conf = predictor
            .predict_weekly(&long, Some(Platform::Youtube))
            .unwrap()
            .predictions[0]
            .confidence;

        assert!(long_conf > short_conf);
    }

    #[test]
    fn test_accuracy_is_mean_confidence() {
        let predictor = TrendPredictor::with_defaults();
        let aggregates = vec![
            agg("gaming", 300, 10),
            agg("music", 500, 10),
            agg("gaming", 400, 11),
            agg("music", 450, 11),
        ];

        let report = predictor
            .predict_weekly(&aggregates, Some(Platform::Youtube))
            .unwrap();
        let mean: f64 = report.predictions.iter().map(|p| p.confidence).sum::<f64>()
            / report.predictions.len() as f64;
        assert!((report.accuracy - mean).abs() < 1e-12);
    }

    #[test]
    fn test_platform_filter_excludes_other_platforms() {
        let predictor = TrendPredictor::with_defaults();
        let mut tiktok = agg("dance", 9000, 10);
        tiktok.platform = Some(Platform::Tiktok);
        let aggregates = vec![agg("gaming", 1000, 10), tiktok];

        let report = predictor
            .predict_weekly(&aggregates, Some(Platform::Youtube))
            .unwrap();
        assert_eq!(report.predictions.len(), 1);
        assert_eq!(report.predictions[0].category, "gaming");
    }

    #[test]
    fn test_seasonal_factors_name_seasons() {
        let predictor = TrendPredictor::with_defaults();
        let aggregates = vec![
            month_agg("gaming", 1000, 3, 2025),
            month_agg("gaming", 1500, 6, 2025),
        ];

        let reference = "2025-07-15T00:00:00Z".parse().unwrap();
        let report = predictor
            .predict_seasonal(&aggregates, Some(Platform::Youtube), reference)
            .unwrap();

        let factors = &report.predictions[0].factors;
        assert!(factors.contains(&"current season: summer".to_string()));
        assert!(factors.contains(&"upcoming season: autumn".to_string()));
        assert_eq!(report.predictions[0].timeframe, "seasonal");
    }

    #[test]
    fn test_seasonal_december_joins_following_winter() {
        let predictor = TrendPredictor::with_defaults();
        // Dec 2024 and Jan 2025 should land in the same winter bucket, so a
        // single category has one season of history.
        let aggregates = vec![
            month_agg("gaming", 1000, 12, 2024),
            month_agg("gaming", 2000, 1, 2025),
        ];

        let reference = "2025-01-20T00:00:00Z".parse().unwrap();
        let report = predictor
            .predict_seasonal(&aggregates, Some(Platform::Youtube), reference)
            .unwrap();

        // One combined bucket => limited history confidence floor
        assert_eq!(report.predictions[0].confidence, 0.3);
    }

    #[test]
    fn test_determinism() {
        let predictor = TrendPredictor::with_defaults();
        let aggregates = vec![
            agg("gaming", 300, 10),
            agg("music", 500, 10),
            agg("gaming", 450, 11),
            agg("music", 400, 11),
        ];

        let a = predictor
            .predict_weekly(&aggregates, Some(Platform::Youtube))
            .unwrap();
        let b = predictor
            .predict_weekly(&aggregates, Some(Platform::Youtube))
            .unwrap();

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
