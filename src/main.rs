use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trendlens::aggregate::{aggregate, GroupBy, PeriodType};
use trendlens::category::CategoryAnalyzer;
use trendlens::config::AnalyticsConfig;
use trendlens::engagement::{ContentQuery, EngagementAnalyzer, SortField, SortOrder};
use trendlens::models::{Platform, Timeframe};
use trendlens::predictor::TrendPredictor;
use trendlens::store::{load_content_records, MemoryStore, RecordStore};

#[derive(Parser)]
#[command(
    name = "trendlens",
    version,
    about = "Social media trend prediction and category relationship analytics",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    /// Configuration file (TOML); falls back to TRENDLENS_* env vars
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate raw trend records into period metrics
    Aggregate {
        /// JSON file containing an array of trend records
        #[arg(short, long)]
        input: PathBuf,

        /// Period granularity (week, month)
        #[arg(short, long, default_value = "week")]
        period: String,
    },

    /// Predict category trends for a platform
    Predict {
        /// JSON file containing an array of trend records
        #[arg(short, long)]
        input: PathBuf,

        /// Platform to analyze (youtube, tiktok, x, instagram); all if omitted
        #[arg(short, long)]
        platform: Option<String>,

        /// Prediction horizon (week, month, season)
        #[arg(long, default_value = "week")]
        horizon: String,

        /// Reference time (RFC 3339); defaults to now
        #[arg(long)]
        reference: Option<DateTime<Utc>>,
    },

    /// Analyze category relationships and clusters
    Relations {
        /// JSON file containing an array of trend records
        #[arg(short, long)]
        input: PathBuf,

        /// Platform to analyze; all if omitted
        #[arg(short, long)]
        platform: Option<String>,

        /// Abort analysis after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Detect emerging categories
    Emerging {
        /// JSON file containing an array of trend records
        #[arg(short, long)]
        input: PathBuf,

        /// Platform to analyze; all if omitted
        #[arg(short, long)]
        platform: Option<String>,
    },

    /// Compute engagement metrics over content records
    Engagement {
        /// JSON file containing an array of content records
        #[arg(short, long)]
        input: PathBuf,

        /// Platform to analyze; all if omitted
        #[arg(short, long)]
        platform: Option<String>,

        /// Analysis timeframe (week, month, quarter)
        #[arg(short, long, default_value = "week")]
        timeframe: String,

        /// Reference time (RFC 3339); defaults to now
        #[arg(long)]
        reference: Option<DateTime<Utc>>,
    },

    /// Rank content performance
    Content {
        /// JSON file containing an array of content records
        #[arg(short, long)]
        input: PathBuf,

        /// Platform to analyze; all if omitted
        #[arg(short, long)]
        platform: Option<String>,

        /// Sort field (engagement_score, views, likes, viral_potential)
        #[arg(long, default_value = "engagement_score")]
        sort: String,

        /// Sort order (desc, asc)
        #[arg(long, default_value = "desc")]
        order: String,

        /// Restrict to these content ids
        #[arg(long, value_delimiter = ',')]
        ids: Option<Vec<String>>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    let config = match &cli.config {
        Some(path) => AnalyticsConfig::from_file(path)?,
        None => AnalyticsConfig::from_env()?,
    };
    config.validate()?;

    match cli.command {
        Commands::Aggregate { input, period } => {
            let period_type = parse_period(&period)?;
            let store = MemoryStore::from_json_file(&input)?;
            let records = store.fetch_records(None, None)?;

            tracing::info!(records = records.len(), period = %period, "aggregating records");
            let aggregates = aggregate(
                &records,
                &GroupBy::full(),
                period_type,
                config.aggregate.top_hashtags,
            )?;
            print_json(&aggregates)?;
        }

        Commands::Predict {
            input,
            platform,
            horizon,
            reference,
        } => {
            let platform = parse_platform(platform.as_deref())?;
            let store = MemoryStore::from_json_file(&input)?;
            let records = store.fetch_records(platform, None)?;

            // Seasonal prediction buckets by month; the others by week/month
            let period_type = match horizon.as_str() {
                "week" => PeriodType::Week,
                "month" | "season" => PeriodType::Month,
                other => anyhow::bail!("unknown horizon: {other} (expected week, month, season)"),
            };

            let aggregates = aggregate(
                &records,
                &GroupBy::full(),
                period_type,
                config.aggregate.top_hashtags,
            )?;

            tracing::info!(
                platform = ?platform,
                horizon = %horizon,
                aggregates = aggregates.len(),
                "predicting trends"
            );

            let predictor = TrendPredictor::new(config.predictor);
            let report = match horizon.as_str() {
                "week" => predictor.predict_weekly(&aggregates, platform)?,
                "month" => predictor.predict_monthly(&aggregates, platform)?,
                _ => {
                    let reference = reference.unwrap_or_else(Utc::now);
                    predictor.predict_seasonal(&aggregates, platform, reference)?
                }
            };
            print_json(&report)?;
        }

        Commands::Relations {
            input,
            platform,
            timeout_ms,
        } => {
            let platform = parse_platform(platform.as_deref())?;
            let store = MemoryStore::from_json_file(&input)?;
            let records = store.fetch_records(platform, None)?;

            let aggregates = aggregate(
                &records,
                &GroupBy::full(),
                PeriodType::Week,
                config.aggregate.top_hashtags,
            )?;

            let deadline = timeout_ms.map(|ms| Instant::now() + Duration::from_millis(ms));
            tracing::info!(platform = ?platform, "analyzing category relations");

            let analyzer = CategoryAnalyzer::new(config.category);
            let report =
                analyzer.analyze_relations(&aggregates, platform, PeriodType::Week, deadline)?;
            print_json(&report)?;
        }

        Commands::Emerging { input, platform } => {
            let platform = parse_platform(platform.as_deref())?;
            let store = MemoryStore::from_json_file(&input)?;
            let records = store.fetch_records(platform, None)?;

            let aggregates = aggregate(
                &records,
                &GroupBy::full(),
                PeriodType::Week,
                config.aggregate.top_hashtags,
            )?;

            tracing::info!(platform = ?platform, "detecting emerging categories");
            let analyzer = CategoryAnalyzer::new(config.category);
            let emerging = analyzer.detect_emerging(&aggregates, platform, PeriodType::Week)?;
            print_json(&emerging)?;
        }

        Commands::Engagement {
            input,
            platform,
            timeframe,
            reference,
        } => {
            let platform = parse_platform(platform.as_deref())?;
            let timeframe = Timeframe::parse(&timeframe)
                .with_context(|| format!("unknown timeframe: {timeframe}"))?;
            let content = load_content_records(&input)?;
            let reference = reference.unwrap_or_else(Utc::now);

            tracing::info!(
                platform = ?platform,
                timeframe = %timeframe,
                content = content.len(),
                "computing engagement metrics"
            );

            let analyzer = EngagementAnalyzer::new(config.engagement);
            let report = analyzer.analyze_metrics(&content, platform, timeframe, reference)?;
            print_json(&report)?;
        }

        Commands::Content {
            input,
            platform,
            sort,
            order,
            ids,
        } => {
            let query = ContentQuery {
                content_ids: ids.map(|ids| ids.into_iter().collect::<HashSet<_>>()),
                platform: parse_platform(platform.as_deref())?,
                sort_field: SortField::parse(&sort)?,
                sort_order: SortOrder::parse(&order)?,
            };
            let content = load_content_records(&input)?;

            tracing::info!(content = content.len(), "ranking content performance");
            let analyzer = EngagementAnalyzer::new(config.engagement);
            let ranked = analyzer.rank_content(&content, &query)?;
            print_json(&ranked)?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("trendlens=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("trendlens=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

fn parse_platform(value: Option<&str>) -> Result<Option<Platform>> {
    match value {
        None => Ok(None),
        Some(s) => Platform::parse(s)
            .with_context(|| format!("unknown platform: {s}"))
            .map(Some),
    }
}

fn parse_period(value: &str) -> Result<PeriodType> {
    match value.to_lowercase().as_str() {
        "week" | "weekly" => Ok(PeriodType::Week),
        "month" | "monthly" => Ok(PeriodType::Month),
        other => anyhow::bail!("unknown period: {other} (expected week or month)"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
