//! Metric aggregation over raw trend records
//!
//! This module reduces noisy time-series records into per-group summary
//! statistics:
//! - Grouping by (period, platform, category) with configurable axes
//! - View/like/comment totals and averages per group
//! - Top-hashtag extraction with stable tie-breaking
//!
//! Aggregation is a pure function of its inputs: no clock reads, no I/O,
//! identical input always produces identical output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::models::{Platform, TrendRecord};

/// Errors that can occur during aggregation
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("Record has invalid period numbers: week {week}, month {month} (category {category})")]
    InvalidPeriod {
        week: u8,
        month: u8,
        category: String,
    },

    #[error("Internal computation error in {operation}: {detail}")]
    Internal { operation: String, detail: String },
}

/// Result type for aggregation operations
pub type AggregateResult<T> = Result<T, AggregateError>;

/// Period granularity for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Week,
    Month,
}

impl PeriodType {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

/// Chronologically ordered period key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    pub period_type: PeriodType,
    pub year: u16,
    pub number: u16,
}

impl PeriodKey {
    /// Extract the period key for a record under the given granularity
    pub fn for_record(record: &TrendRecord, period_type: PeriodType) -> Self {
        let number = match period_type {
            PeriodType::Week => u16::from(record.week_number),
            PeriodType::Month => u16::from(record.month_number),
        };
        Self {
            period_type,
            year: record.year,
            number,
        }
    }
}

impl Ord for PeriodKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.period_type, self.year, self.number).cmp(&(
            other.period_type,
            other.year,
            other.number,
        ))
    }
}

impl PartialOrd for PeriodKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.period_type.as_str(), self.year, self.number)
    }
}

/// Grouping axes for aggregation
///
/// The period is always part of the group key; platform and category join
/// it when enabled here.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GroupBy {
    pub platform: bool,
    pub category: bool,
}

impl GroupBy {
    /// Group by platform, category and period (the common full grouping)
    pub fn full() -> Self {
        Self {
            platform: true,
            category: true,
        }
    }
}

/// Summary statistics for one (period, platform, category) group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodAggregate {
    pub period: PeriodKey,
    pub platform: Option<Platform>,
    pub category: Option<String>,
    pub count: u64,
    pub total_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub avg_views: f64,
    /// Top hashtags by frequency, ties broken by first-seen order
    pub top_hashtags: Vec<(String, u64)>,
}

#[derive(Default)]
struct GroupAccumulator {
    count: u64,
    total_views: u64,
    total_likes: u64,
    total_comments: u64,
    /// hashtag -> (count, first-seen index) for stable tie-breaking
    hashtags: HashMap<String, (u64, usize)>,
}

impl GroupAccumulator {
    fn absorb(&mut self, record: &TrendRecord) {
        self.count += 1;
        self.total_views += record.views;
        self.total_likes += u64::from(record.likes);
        self.total_comments += u64::from(record.comments);

        for tag in &record.hashtags {
            let first_seen = self.hashtags.len();
            let entry = self.hashtags.entry(tag.clone()).or_insert((0, first_seen));
            entry.0 += 1;
        }
    }

    fn top_hashtags(&self, limit: usize) -> Vec<(String, u64)> {
        let mut tags: Vec<_> = self
            .hashtags
            .iter()
            .map(|(tag, &(count, first_seen))| (tag.clone(), count, first_seen))
            .collect();

        // Frequency descending, then first-seen ascending (stable ties)
        tags.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        tags.truncate(limit);
        tags.into_iter().map(|(tag, count, _)| (tag, count)).collect()
    }
}

/// Aggregate raw records into per-group summary statistics
///
/// Groups records by period (always) plus the axes enabled in `group_by`,
/// then reduces each group into a [`PeriodAggregate`]. Empty groups are
/// never emitted, so `avg_views` is always well defined.
///
/// # Arguments
/// * `records` - Raw trend records from the store
/// * `group_by` - Which axes join the period in the group key
/// * `period_type` - Week or month granularity
/// * `top_hashtags` - Number of hashtags reported per group
///
/// # Errors
/// Returns [`AggregateError::InvalidPeriod`] for records whose week or
/// month numbers fall outside their valid ranges.
pub fn aggregate(
    records: &[TrendRecord],
    group_by: &GroupBy,
    period_type: PeriodType,
    top_hashtags: usize,
) -> AggregateResult<Vec<PeriodAggregate>> {
    let mut groups: HashMap<(PeriodKey, Option<Platform>, Option<String>), GroupAccumulator> =
        HashMap::new();

    for record in records {
        if !record.has_valid_period() {
            return Err(AggregateError::InvalidPeriod {
                week: record.week_number,
                month: record.month_number,
                category: record.category.clone(),
            });
        }

        let key = (
            PeriodKey::for_record(record, period_type),
            group_by.platform.then_some(record.platform),
            group_by.category.then(|| record.category.clone()),
        );

        groups.entry(key).or_default().absorb(record);
    }

    let mut aggregates = Vec::with_capacity(groups.len());
    for ((period, platform, category), acc) in groups {
        if acc.count == 0 {
            return Err(AggregateError::Internal {
                operation: "aggregate".to_string(),
                detail: format!("empty group emitted for period {period}"),
            });
        }

        aggregates.push(PeriodAggregate {
            period,
            platform,
            category,
            count: acc.count,
            total_views: acc.total_views,
            total_likes: acc.total_likes,
            total_comments: acc.total_comments,
            avg_views: acc.total_views as f64 / acc.count as f64,
            top_hashtags: acc.top_hashtags(top_hashtags),
        });
    }

    // Deterministic output order: period, then platform, then category
    aggregates.sort_by(|a, b| {
        a.period
            .cmp(&b.period)
            .then_with(|| a.platform.cmp(&b.platform))
            .then_with(|| a.category.cmp(&b.category))
    });

    debug!(
        records = records.len(),
        groups = aggregates.len(),
        period_type = period_type.as_str(),
        "aggregated trend records"
    );

    Ok(aggregates)
}
