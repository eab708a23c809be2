// Core data structures for the trendlens analytics engine

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Social media platform enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Youtube,
    Tiktok,
    X,
    Instagram,
}

impl Platform {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Tiktok => "tiktok",
            Self::X => "x",
            Self::Instagram => "instagram",
        }
    }

    /// Create from string (supports common aliases)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "youtube" | "yt" => Some(Self::Youtube),
            "tiktok" | "tt" => Some(Self::Tiktok),
            "x" | "twitter" => Some(Self::X),
            "instagram" | "ig" => Some(Self::Instagram),
            _ => None,
        }
    }

    /// Get all platforms
    pub fn all() -> Vec<Self> {
        vec![Self::Youtube, Self::Tiktok, Self::X, Self::Instagram]
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single collected trend observation
///
/// Records arrive from an external store and are noisy: `views >= likes + comments`
/// is NOT guaranteed and must be tolerated downstream. Period numbers, however,
/// are validated at aggregation time (`week_number` 1-53, `month_number` 1-12).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendRecord {
    pub platform: Platform,
    pub category: String,
    pub views: u64,
    pub likes: u32,
    pub comments: u32,
    #[serde(default)]
    pub hashtags: Vec<String>,
    pub collected_at: DateTime<Utc>,
    pub week_number: u8,
    pub month_number: u8,
    pub year: u16,
}

impl TrendRecord {
    /// Check the period-number invariants without consuming the record
    pub fn has_valid_period(&self) -> bool {
        (1..=53).contains(&self.week_number) && (1..=12).contains(&self.month_number)
    }
}

/// A single piece of content for engagement analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub content_id: String,
    pub title: String,
    pub platform: Platform,
    pub views: u64,
    pub likes: u32,
    pub comments: u32,
    pub collected_at: DateTime<Utc>,
}

/// Analysis timeframe for engagement queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Week,
    Month,
    Quarter,
}

impl Timeframe {
    /// Create from string (supports duration shorthand)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "week" | "weekly" | "7d" => Some(Self::Week),
            "month" | "monthly" | "30d" => Some(Self::Month),
            "quarter" | "quarterly" | "90d" => Some(Self::Quarter),
            _ => None,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
        }
    }

    /// Inclusion cutoff relative to an explicit reference time
    ///
    /// The reference is passed in rather than read from the clock so that
    /// identical inputs always produce identical outputs.
    pub fn cutoff(&self, reference: DateTime<Utc>) -> DateTime<Utc> {
        let days = match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
        };
        reference - Duration::days(days)
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Meteorological season used for seasonal trend bucketing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Season for a calendar month (1-12)
    ///
    /// Spring is months 3-5, summer 6-8, autumn 9-11, winter 12, 1 and 2.
    pub fn from_month(month: u8) -> Option<Self> {
        match month {
            3..=5 => Some(Self::Spring),
            6..=8 => Some(Self::Summer),
            9..=11 => Some(Self::Autumn),
            12 | 1 | 2 => Some(Self::Winter),
            _ => None,
        }
    }

    /// The season that follows this one
    pub fn next(&self) -> Self {
        match self {
            Self::Spring => Self::Summer,
            Self::Summer => Self::Autumn,
            Self::Autumn => Self::Winter,
            Self::Winter => Self::Spring,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
