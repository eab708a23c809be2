use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use trendlens::aggregate::{aggregate, GroupBy, PeriodType};
use trendlens::category::CategoryAnalyzer;
use trendlens::models::{Platform, TrendRecord};
use trendlens::predictor::TrendPredictor;

fn synthetic_records(categories: usize, weeks: u8) -> Vec<TrendRecord> {
    let mut records = Vec::new();
    for week in 1..=weeks {
        for c in 0..categories {
            records.push(TrendRecord {
                platform: Platform::Youtube,
                category: format!("category-{c}"),
                views: 1000 + (c as u64 * 37 + u64::from(week) * 101) % 50_000,
                likes: 50,
                comments: 10,
                hashtags: vec![format!("#c{c}")],
                collected_at: Utc::now(),
                week_number: week,
                month_number: ((week - 1) / 4 % 12) + 1,
                year: 2025,
            });
        }
    }
    records
}

fn bench_aggregate(c: &mut Criterion) {
    let records = synthetic_records(100, 12);
    c.bench_function("aggregate_100x12", |b| {
        b.iter(|| {
            aggregate(
                black_box(&records),
                &GroupBy::full(),
                PeriodType::Week,
                10,
            )
            .unwrap()
        })
    });
}

fn bench_predict(c: &mut Criterion) {
    let records = synthetic_records(100, 12);
    let aggregates = aggregate(&records, &GroupBy::full(), PeriodType::Week, 10).unwrap();
    let predictor = TrendPredictor::with_defaults();

    c.bench_function("predict_weekly_100x12", |b| {
        b.iter(|| {
            predictor
                .predict_weekly(black_box(&aggregates), Some(Platform::Youtube))
                .unwrap()
        })
    });
}

fn bench_relations(c: &mut Criterion) {
    let records = synthetic_records(60, 12);
    let aggregates = aggregate(&records, &GroupBy::full(), PeriodType::Week, 10).unwrap();
    let analyzer = CategoryAnalyzer::with_defaults();

    c.bench_function("relations_60x12", |b| {
        b.iter(|| {
            analyzer
                .analyze_relations(
                    black_box(&aggregates),
                    Some(Platform::Youtube),
                    PeriodType::Week,
                    None,
                )
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_aggregate, bench_predict, bench_relations);
criterion_main!(benches);
