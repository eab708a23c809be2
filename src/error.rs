//! Unified error handling for the trendlens crate
//!
//! Each analysis module defines its own thiserror enum; this module folds
//! them into a single [`Error`] usable across module boundaries, classified
//! by [`ErrorCategory`] for caller handling strategies.
//!
//! Insufficient data is deliberately NOT represented here: empty or
//! single-period inputs produce well-defined low-confidence results, never
//! errors.

use std::io;
use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::aggregate::AggregateError;
pub use crate::category::CategoryError;
pub use crate::engagement::EngagementError;
pub use crate::predictor::PredictError;
pub use crate::store::StoreError;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller passed unsupported input (platform, timeframe, sort field,
    /// malformed record periods) — fix the request, never retry
    Input,
    /// Impossible numeric state inside a computation — retry the whole call
    Internal,
    /// Caller-imposed deadline ran out mid-analysis
    Deadline,
    /// Storage and I/O errors at the data boundary
    Storage,
    /// Serialization and config-parsing errors
    Parsing,
    /// Configuration validation errors
    Config,
    /// Other/unknown errors
    Other,
}

/// Unified error type for the trendlens crate
#[derive(Error, Debug)]
pub enum Error {
    /// Aggregation errors
    #[error("Aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    /// Trend prediction errors
    #[error("Prediction error: {0}")]
    Predict(#[from] PredictError),

    /// Category analysis errors
    #[error("Category analysis error: {0}")]
    Category(#[from] CategoryError),

    /// Engagement analysis errors
    #[error("Engagement error: {0}")]
    Engagement(#[from] EngagementError),

    /// Storage-layer errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Aggregate(AggregateError::InvalidPeriod { .. }) => ErrorCategory::Input,
            Self::Aggregate(AggregateError::Internal { .. }) => ErrorCategory::Internal,
            Self::Predict(PredictError::MissingCategory { .. }) => ErrorCategory::Input,
            Self::Predict(PredictError::Internal { .. }) => ErrorCategory::Internal,
            Self::Category(CategoryError::MissingCategory { .. }) => ErrorCategory::Input,
            Self::Category(CategoryError::DeadlineExceeded { .. }) => ErrorCategory::Deadline,
            Self::Category(CategoryError::Internal { .. }) => ErrorCategory::Internal,
            Self::Engagement(_) => ErrorCategory::Input,
            Self::Store(StoreError::InvalidRange { .. }) => ErrorCategory::Input,
            Self::Store(_) | Self::Io(_) => ErrorCategory::Storage,
            Self::Json(_) => ErrorCategory::Parsing,
            Self::Config(_) => ErrorCategory::Config,
        }
    }

    /// Check if retrying the whole call could succeed
    ///
    /// Input, config and deadline errors need a changed request; internal
    /// and storage errors are worth one whole-call retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Internal | ErrorCategory::Storage
        )
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
