//! Common test utilities

use chrono::Utc;
use trendlens::models::{ContentRecord, Platform, TrendRecord};

/// Create a trend record for a given category, week and view count
pub fn record(platform: Platform, category: &str, views: u64, week: u8) -> TrendRecord {
    TrendRecord {
        platform,
        category: category.to_string(),
        views,
        likes: (views / 20) as u32,
        comments: (views / 100) as u32,
        hashtags: vec![format!("#{category}")],
        collected_at: Utc::now(),
        week_number: week,
        month_number: ((week - 1) / 4 % 12) + 1,
        year: 2025,
    }
}

/// Create a content record with explicit interaction counts
#[allow(dead_code)]
pub fn content(
    id: &str,
    platform: Platform,
    views: u64,
    likes: u32,
    comments: u32,
) -> ContentRecord {
    ContentRecord {
        content_id: id.to_string(),
        title: format!("Content {id}"),
        platform,
        views,
        likes,
        comments,
        collected_at: Utc::now(),
    }
}

/// Two platforms, three categories, four weeks of history
#[allow(dead_code)]
pub fn multi_platform_fixture() -> Vec<TrendRecord> {
    let mut records = Vec::new();
    for week in 10..14 {
        let boost = u64::from(week) * 100;
        records.push(record(Platform::Youtube, "gaming", 1000 + boost, week));
        records.push(record(Platform::Youtube, "music", 2000, week));
        records.push(record(Platform::Tiktok, "dance", 3000 + boost * 2, week));
    }
    records
}
