//! Tests for category relationship analysis end to end

mod common;

use proptest::prelude::*;
use std::collections::BTreeSet;
use trendlens::aggregate::{aggregate, GroupBy, PeriodType};
use trendlens::category::CategoryAnalyzer;
use trendlens::models::Platform;

fn analyze(records: &[trendlens::models::TrendRecord]) -> trendlens::category::RelationReport {
    let aggregates = aggregate(records, &GroupBy::full(), PeriodType::Week, 10).unwrap();
    CategoryAnalyzer::with_defaults()
        .analyze_relations(&aggregates, Some(Platform::Youtube), PeriodType::Week, None)
        .unwrap()
}

/// gaming+esports co-trend for four weeks, then cooking+baking for four,
/// with music drifting through everything
fn clustered_records() -> Vec<trendlens::models::TrendRecord> {
    let mut records = Vec::new();
    for week in 10..14u8 {
        records.push(common::record(Platform::Youtube, "gaming", 5000, week));
        records.push(common::record(Platform::Youtube, "esports", 4000, week));
    }
    for week in 20..24u8 {
        records.push(common::record(Platform::Youtube, "cooking", 3000, week));
        records.push(common::record(Platform::Youtube, "baking", 2500, week));
    }
    records.push(common::record(Platform::Youtube, "music", 100, 12));
    records
}

#[test]
fn test_two_disjoint_clusters() {
    let report = analyze(&clustered_records());

    assert_eq!(report.clusters.len(), 2);
    assert_eq!(report.clusters[0].categories, vec!["baking", "cooking"]);
    assert_eq!(report.clusters[1].categories, vec!["esports", "gaming"]);
}

#[test]
fn test_every_strong_category_in_exactly_one_cluster() {
    let report = analyze(&clustered_records());

    let mut seen = BTreeSet::new();
    for cluster in &report.clusters {
        for category in &cluster.categories {
            assert!(seen.insert(category.clone()), "{category} appears twice");
        }
    }
    for rel in &report.strong_relations {
        assert!(seen.contains(&rel.category_a));
        assert!(seen.contains(&rel.category_b));
    }
}

#[test]
fn test_emerging_pipeline() {
    let mut records = Vec::new();
    records.push(common::record(Platform::Youtube, "ai", 100_000, 10));
    records.push(common::record(Platform::Youtube, "ai", 160_000, 11));
    records.push(common::record(Platform::Youtube, "frogs", 2, 10));
    records.push(common::record(Platform::Youtube, "frogs", 3, 11));

    let aggregates = aggregate(&records, &GroupBy::full(), PeriodType::Week, 10).unwrap();
    let emerging = CategoryAnalyzer::with_defaults()
        .detect_emerging(&aggregates, Some(Platform::Youtube), PeriodType::Week)
        .unwrap();

    assert_eq!(emerging.len(), 1);
    assert_eq!(emerging[0].name, "ai");
    assert_eq!(emerging[0].estimated_size, 160_000);
}

proptest! {
    /// The relation matrix is symmetric with scores in [0, 1] for any input
    #[test]
    fn prop_matrix_symmetric_and_bounded(
        views in prop::collection::vec(1u64..100_000, 4..24),
    ) {
        let categories = ["a", "b", "c", "d"];
        let records: Vec<_> = views
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let week = 10 + (i / categories.len()) as u8;
                common::record(Platform::Youtube, categories[i % categories.len()], v, week)
            })
            .collect();

        let report = analyze(&records);
        for (a, row) in &report.matrix {
            for (b, score) in row {
                prop_assert!((0.0..=1.0).contains(score));
                prop_assert_eq!(report.matrix[b][a], *score);
                prop_assert_ne!(a, b);
            }
        }
    }

    /// Clusters partition the strongly-related categories
    #[test]
    fn prop_cluster_partition(
        views in prop::collection::vec(1u64..100_000, 4..24),
    ) {
        let categories = ["a", "b", "c", "d"];
        let records: Vec<_> = views
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let week = 10 + (i / categories.len()) as u8;
                common::record(Platform::Youtube, categories[i % categories.len()], v, week)
            })
            .collect();

        let report = analyze(&records);

        let mut seen = BTreeSet::new();
        for cluster in &report.clusters {
            prop_assert!(!cluster.categories.is_empty());
            for category in &cluster.categories {
                prop_assert!(seen.insert(category.clone()));
            }
        }

        let mut strong = BTreeSet::new();
        for rel in &report.strong_relations {
            strong.insert(rel.category_a.clone());
            strong.insert(rel.category_b.clone());
        }
        prop_assert_eq!(strong, seen);
    }
}
