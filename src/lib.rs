//! trendlens - Social media trend analytics engine
//!
//! A deterministic analytics core for social-media trend data: it reduces
//! noisy time-series engagement records into period aggregates, projects
//! category trends forward with confidence scores, maps category
//! relationships, and scores content engagement against fixed industry
//! benchmarks.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Named tunable constants, env/TOML loading, validation
//! - [`models`] - Core value types (platforms, records, timeframes)
//! - [`aggregate`] - Record-to-period-aggregate reduction
//! - [`predictor`] - Weekly/monthly/seasonal trend projection
//! - [`category`] - Relationship matrix, clusters, emergence detection
//! - [`engagement`] - Engagement scoring, viral potential, grading
//! - [`store`] - Narrow read-only data-access seam
//! - [`error`] - Unified error type and categories
//!
//! Every entry point is a pure function of its inputs: no clock reads
//! (time-sensitive operations take an explicit reference timestamp), no
//! randomness, no I/O inside the core. Identical input always yields
//! identical output, so concurrent calls need no coordination.
//!
//! # Example
//!
//! ```
//! use trendlens::aggregate::{aggregate, GroupBy, PeriodType};
//! use trendlens::predictor::TrendPredictor;
//! use trendlens::models::Platform;
//!
//! # fn main() -> anyhow::Result<()> {
//! let records = Vec::new(); // fetched from a RecordStore in real use
//! let aggregates = aggregate(&records, &GroupBy::full(), PeriodType::Week, 10)?;
//!
//! let predictor = TrendPredictor::with_defaults();
//! let report = predictor.predict_weekly(&aggregates, Some(Platform::Youtube))?;
//! assert!(report.predictions.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod category;
pub mod config;
pub mod engagement;
pub mod error;
pub mod models;
pub mod predictor;
pub mod store;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::aggregate::{aggregate, GroupBy, PeriodAggregate, PeriodKey, PeriodType};
    pub use crate::category::{CategoryAnalyzer, EmergingCategory, RelationReport};
    pub use crate::config::AnalyticsConfig;
    pub use crate::engagement::{ContentQuery, EngagementAnalyzer, EngagementReport};
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{ContentRecord, Platform, Timeframe, TrendRecord};
    pub use crate::predictor::{PredictionReport, TrendPredictor};
    pub use crate::store::{MemoryStore, PeriodRange, RecordStore};
}

// Direct re-exports for convenience
pub use models::{ContentRecord, Platform, Timeframe, TrendRecord};
