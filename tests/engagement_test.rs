//! Tests for engagement analysis end to end

mod common;

use chrono::Utc;
use proptest::prelude::*;
use trendlens::engagement::{ContentQuery, EngagementAnalyzer, Grade, SortField, SortOrder};
use trendlens::models::{Platform, Timeframe};

#[test]
fn test_grade_scenarios() {
    // 3.6% -> A
    let a = common::content("a", Platform::Youtube, 1000, 30, 6);
    // 1.4% -> D
    let d = common::content("d", Platform::Youtube, 1000, 12, 2);

    let analyzer = EngagementAnalyzer::with_defaults();
    assert_eq!(analyzer.score(&a).grade, Grade::A);
    assert_eq!(analyzer.score(&d).grade, Grade::D);
}

#[test]
fn test_report_contains_all_sections() {
    let analyzer = EngagementAnalyzer::with_defaults();
    let records = vec![
        common::content("yt1", Platform::Youtube, 100_000, 3000, 600),
        common::content("yt2", Platform::Youtube, 50_000, 500, 100),
        common::content("tt1", Platform::Tiktok, 200_000, 10_000, 3000),
    ];

    let report = analyzer
        .analyze_metrics(&records, None, Timeframe::Month, Utc::now())
        .unwrap();

    assert_eq!(report.overall.content_count, 3);
    assert_eq!(report.platform_breakdown.len(), 2);
    assert_eq!(report.viral_content.len(), 3);

    // Viral listing ordered by potential descending
    for pair in report.viral_content.windows(2) {
        assert!(pair[0].viral_potential >= pair[1].viral_potential);
    }
}

#[test]
fn test_platform_filter_restricts_breakdown() {
    let analyzer = EngagementAnalyzer::with_defaults();
    let records = vec![
        common::content("yt1", Platform::Youtube, 1000, 30, 6),
        common::content("tt1", Platform::Tiktok, 1000, 50, 10),
    ];

    let report = analyzer
        .analyze_metrics(&records, Some(Platform::Tiktok), Timeframe::Week, Utc::now())
        .unwrap();

    assert_eq!(report.overall.content_count, 1);
    assert_eq!(report.platform_breakdown.len(), 1);
    assert_eq!(report.platform_breakdown[0].platform, Platform::Tiktok);
}

#[test]
fn test_ranking_total_order_is_stable() {
    let analyzer = EngagementAnalyzer::with_defaults();
    let records = vec![
        common::content("b", Platform::Youtube, 1000, 10, 2),
        common::content("a", Platform::Youtube, 1000, 10, 2),
    ];

    let desc = analyzer.rank_content(&records, &ContentQuery::default()).unwrap();
    let asc = analyzer
        .rank_content(
            &records,
            &ContentQuery {
                sort_order: SortOrder::Asc,
                ..Default::default()
            },
        )
        .unwrap();

    // Ties always break the same way regardless of requested order
    assert_eq!(desc[0].content_id, "a");
    assert_eq!(asc[0].content_id, "a");
}

proptest! {
    /// Scores and potentials stay in [0, 1] for arbitrary interaction counts,
    /// including the noisy case where likes + comments exceed views
    #[test]
    fn prop_scores_bounded(
        views in 0u64..100_000_000,
        likes in 0u32..10_000_000,
        comments in 0u32..10_000_000,
    ) {
        let analyzer = EngagementAnalyzer::with_defaults();
        let record = common::content("x", Platform::Tiktok, views, likes, comments);
        let scored = analyzer.score(&record);

        prop_assert!((0.0..=1.0).contains(&scored.engagement_score));
        prop_assert!((0.0..=1.0).contains(&scored.viral_potential));
        prop_assert!(scored.engagement_rate.is_finite());
    }

    /// Ranking output is a permutation of the filtered input
    #[test]
    fn prop_ranking_preserves_items(
        views in prop::collection::vec(0u64..1_000_000, 1..20),
    ) {
        let analyzer = EngagementAnalyzer::with_defaults();
        let records: Vec<_> = views
            .iter()
            .enumerate()
            .map(|(i, &v)| common::content(&format!("c{i}"), Platform::X, v, 10, 3))
            .collect();

        let query = ContentQuery {
            sort_field: SortField::Views,
            ..Default::default()
        };
        let ranked = analyzer.rank_content(&records, &query).unwrap();
        prop_assert_eq!(ranked.len(), records.len());

        let mut input_ids: Vec<_> = records.iter().map(|r| r.content_id.clone()).collect();
        let mut output_ids: Vec<_> = ranked.iter().map(|r| r.content_id.clone()).collect();
        input_ids.sort();
        output_ids.sort();
        prop_assert_eq!(input_ids, output_ids);
    }
}
