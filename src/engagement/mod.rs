//! Engagement scoring and content performance analysis
//!
//! This module provides functionality for:
//! - Normalized engagement scores against fixed industry benchmarks
//! - Viral-potential estimation from interaction ratio and reach
//! - Letter grading of engagement rates
//! - Deterministic ranking and segmentation of content performance
//!
//! The benchmark table is a fixed industry reference and must not drift:
//! compatible deployments rely on identical grades and scores for
//! identical inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::debug;

use crate::config::EngagementConfig;
use crate::models::{ContentRecord, Platform, Timeframe};

/// Errors that can occur during engagement analysis
#[derive(Debug, Error)]
pub enum EngagementError {
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("Unknown sort order: {0}")]
    UnknownSortOrder(String),
}

/// Result type for engagement operations
pub type EngagementResult<T> = Result<T, EngagementError>;

/// Fixed industry engagement benchmarks (rates in percent)
///
/// YouTube avg 2.8 / top-tier 5.0; TikTok avg 4.2 / top-tier 8.0; the
/// overall row (avg 3.5 / top-tier 6.5) covers platforms without their own
/// entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub average_rate: f64,
    pub top_tier_rate: f64,
}

impl Benchmark {
    /// Benchmark row for a platform
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Youtube => Self {
                average_rate: 2.8,
                top_tier_rate: 5.0,
            },
            Platform::Tiktok => Self {
                average_rate: 4.2,
                top_tier_rate: 8.0,
            },
            Platform::X | Platform::Instagram => Self::overall(),
        }
    }

    /// The cross-platform benchmark row
    pub fn overall() -> Self {
        Self {
            average_rate: 3.5,
            top_tier_rate: 6.5,
        }
    }
}

/// Letter grade for an engagement rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Grade an engagement rate expressed in percent
    ///
    /// Thresholds: S >= 5.0, A >= 3.5, B >= 2.5, C >= 1.5, else D.
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 5.0 {
            Self::S
        } else if rate >= 3.5 {
            Self::A
        } else if rate >= 2.5 {
            Self::B
        } else if rate >= 1.5 {
            Self::C
        } else {
            Self::D
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scored performance of a single content item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPerformance {
    pub content_id: String,
    pub title: String,
    pub platform: Platform,
    pub views: u64,
    pub likes: u32,
    pub comments: u32,
    /// (likes + comments) / views * 100
    pub engagement_rate: f64,
    /// Rate normalized against the platform top-tier ceiling, [0, 1]
    pub engagement_score: f64,
    /// Spread propensity from interaction ratio and reach, [0, 1]
    pub viral_potential: f64,
    pub grade: Grade,
}

/// Aggregate engagement statistics for a filtered content set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallMetrics {
    pub content_count: u64,
    pub total_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    /// Mean per-item engagement rate, percent
    pub avg_engagement_rate: f64,
    pub grade: Grade,
}

/// Per-platform engagement compared against its benchmark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEngagement {
    pub platform: Platform,
    pub content_count: u64,
    pub avg_engagement_rate: f64,
    pub benchmark: Benchmark,
    /// avg_engagement_rate minus the platform's benchmark average
    pub delta_vs_average: f64,
    pub grade: Grade,
}

/// Full engagement metrics output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementReport {
    pub timeframe: Timeframe,
    pub overall: OverallMetrics,
    pub platform_breakdown: Vec<PlatformEngagement>,
    /// Top items by viral potential within the timeframe
    pub viral_content: Vec<ContentPerformance>,
}

/// Sort field for content-performance listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    EngagementScore,
    Views,
    Likes,
    ViralPotential,
}

impl SortField {
    /// Create from string
    pub fn parse(s: &str) -> EngagementResult<Self> {
        match s.to_lowercase().as_str() {
            "engagement_score" | "engagement" | "score" => Ok(Self::EngagementScore),
            "views" => Ok(Self::Views),
            "likes" => Ok(Self::Likes),
            "viral_potential" | "viral" => Ok(Self::ViralPotential),
            other => Err(EngagementError::UnknownSortField(other.to_string())),
        }
    }
}

/// Sort direction for content-performance listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Desc,
    Asc,
}

impl SortOrder {
    /// Create from string
    pub fn parse(s: &str) -> EngagementResult<Self> {
        match s.to_lowercase().as_str() {
            "desc" | "descending" => Ok(Self::Desc),
            "asc" | "ascending" => Ok(Self::Asc),
            other => Err(EngagementError::UnknownSortOrder(other.to_string())),
        }
    }
}

/// Filter and ordering options for content-performance queries
#[derive(Debug, Clone, Default)]
pub struct ContentQuery {
    /// Restrict to these content ids; None means all
    pub content_ids: Option<HashSet<String>>,
    /// Restrict to one platform; None means all
    pub platform: Option<Platform>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

/// Engagement analyzer over in-memory content records
#[derive(Debug, Clone)]
pub struct EngagementAnalyzer {
    config: EngagementConfig,
}

impl EngagementAnalyzer {
    /// Create an analyzer with the given configuration
    pub fn new(config: EngagementConfig) -> Self {
        Self { config }
    }

    /// Create an analyzer with default configuration
    pub fn with_defaults() -> Self {
        Self::new(EngagementConfig::default())
    }

    /// Engagement rate in percent: (likes + comments) / views * 100
    ///
    /// The denominator is floored at one view so zero-view items score 0
    /// rather than dividing by zero.
    pub fn engagement_rate(record: &ContentRecord) -> f64 {
        let interactions = u64::from(record.likes) + u64::from(record.comments);
        interactions as f64 / record.views.max(1) as f64 * 100.0
    }

    /// Engagement rate rescaled against the platform top-tier ceiling
    ///
    /// Rates above the ceiling clamp to 1.0.
    pub fn engagement_score(record: &ContentRecord) -> f64 {
        let ceiling = Benchmark::for_platform(record.platform).top_tier_rate;
        (Self::engagement_rate(record) / ceiling).min(1.0)
    }

    /// Viral potential, [0, 1]
    ///
    /// A weighted blend of the share-velocity proxy (comments/likes ratio,
    /// capped at 1) and absolute reach (views against the configured
    /// saturation point). Weights come from the configuration and default
    /// to 0.6 velocity / 0.4 reach.
    pub fn viral_potential(&self, record: &ContentRecord) -> f64 {
        let velocity =
            (f64::from(record.comments) / f64::from(record.likes.max(1))).min(1.0);
        let reach = (record.views as f64 / self.config.reach_saturation).min(1.0);

        (self.config.viral_velocity_weight * velocity
            + self.config.viral_reach_weight * reach)
            .clamp(0.0, 1.0)
    }

    /// Score one content record
    pub fn score(&self, record: &ContentRecord) -> ContentPerformance {
        let rate = Self::engagement_rate(record);
        ContentPerformance {
            content_id: record.content_id.clone(),
            title: record.title.clone(),
            platform: record.platform,
            views: record.views,
            likes: record.likes,
            comments: record.comments,
            engagement_rate: rate,
            engagement_score: Self::engagement_score(record),
            viral_potential: self.viral_potential(record),
            grade: Grade::from_rate(rate),
        }
    }

    /// Compute overall, per-platform and viral-content metrics
    ///
    /// # Arguments
    /// * `content` - Content records to analyze
    /// * `platform` - Restrict to one platform, or None for all
    /// * `timeframe` - Inclusion window ending at `reference`
    /// * `reference` - Explicit "now" so identical inputs give identical output
    pub fn analyze_metrics(
        &self,
        content: &[ContentRecord],
        platform: Option<Platform>,
        timeframe: Timeframe,
        reference: DateTime<Utc>,
    ) -> EngagementResult<EngagementReport> {
        let cutoff = timeframe.cutoff(reference);
        let selected: Vec<&ContentRecord> = content
            .iter()
            .filter(|c| c.collected_at >= cutoff && c.collected_at <= reference)
            .filter(|c| platform.is_none() || Some(c.platform) == platform)
            .collect();

        let mut scored: Vec<ContentPerformance> =
            selected.iter().map(|c| self.score(c)).collect();

        let content_count = scored.len() as u64;
        let total_views: u64 = scored.iter().map(|c| c.views).sum();
        let total_likes: u64 = scored.iter().map(|c| u64::from(c.likes)).sum();
        let total_comments: u64 = scored.iter().map(|c| u64::from(c.comments)).sum();
        let avg_rate = if scored.is_empty() {
            0.0
        } else {
            scored.iter().map(|c| c.engagement_rate).sum::<f64>() / scored.len() as f64
        };

        let overall = OverallMetrics {
            content_count,
            total_views,
            total_likes,
            total_comments,
            avg_engagement_rate: avg_rate,
            grade: Grade::from_rate(avg_rate),
        };

        // Per-platform rollup in platform order for deterministic output
        let mut by_platform: BTreeMap<Platform, Vec<&ContentPerformance>> = BTreeMap::new();
        for item in &scored {
            by_platform.entry(item.platform).or_default().push(item);
        }

        let platform_breakdown = by_platform
            .into_iter()
            .map(|(platform, items)| {
                let avg = items.iter().map(|c| c.engagement_rate).sum::<f64>()
                    / items.len() as f64;
                let benchmark = Benchmark::for_platform(platform);
                PlatformEngagement {
                    platform,
                    content_count: items.len() as u64,
                    avg_engagement_rate: avg,
                    benchmark,
                    delta_vs_average: avg - benchmark.average_rate,
                    grade: Grade::from_rate(avg),
                }
            })
            .collect();

        // Viral listing: potential descending, deterministic tie-break
        scored.sort_by(|a, b| {
            b.viral_potential
                .partial_cmp(&a.viral_potential)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.views.cmp(&a.views))
                .then_with(|| a.content_id.cmp(&b.content_id))
        });
        scored.truncate(self.config.viral_top_n);

        debug!(
            content = content_count,
            timeframe = %timeframe,
            "engagement metrics computed"
        );

        Ok(EngagementReport {
            timeframe,
            overall,
            platform_breakdown,
            viral_content: scored,
        })
    }

    /// Rank content performance with filters and a deterministic total order
    ///
    /// Ties on the requested field break by views descending, then by
    /// content id ascending, regardless of the requested order.
    pub fn rank_content(
        &self,
        content: &[ContentRecord],
        query: &ContentQuery,
    ) -> EngagementResult<Vec<ContentPerformance>> {
        let mut scored: Vec<ContentPerformance> = content
            .iter()
            .filter(|c| {
                query
                    .content_ids
                    .as_ref()
                    .map(|ids| ids.contains(&c.content_id))
                    .unwrap_or(true)
            })
            .filter(|c| query.platform.is_none() || Some(c.platform) == query.platform)
            .map(|c| self.score(c))
            .collect();

        let field = query.sort_field;
        scored.sort_by(|a, b| {
            let primary = match field {
                SortField::EngagementScore => b
                    .engagement_score
                    .partial_cmp(&a.engagement_score)
                    .unwrap_or(std::cmp::Ordering::Equal),
                SortField::Views => b.views.cmp(&a.views),
                SortField::Likes => b.likes.cmp(&a.likes),
                SortField::ViralPotential => b
                    .viral_potential
                    .partial_cmp(&a.viral_potential)
                    .unwrap_or(std::cmp::Ordering::Equal),
            };

            let primary = match query.sort_order {
                SortOrder::Desc => primary,
                SortOrder::Asc => primary.reverse(),
            };

            primary
                .then_with(|| b.views.cmp(&a.views))
                .then_with(|| a.content_id.cmp(&b.content_id))
        });

        Ok(scored)
    }
}

impl Default for EngagementAnalyzer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
