//! Record storage seam
//!
//! The analytics core performs no I/O of its own: records arrive through
//! the narrow [`RecordStore`] trait so any persistence backend can feed the
//! analyzers. An in-memory implementation covers tests and the CLI, which
//! loads records from JSON files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::models::{ContentRecord, Platform, TrendRecord};

/// Errors that can occur in the storage layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid time range: start {start} is after end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Inclusive collection-time range for record fetches
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl PeriodRange {
    /// Create a validated range
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> StoreResult<Self> {
        if start > end {
            return Err(StoreError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Check whether a timestamp falls inside the range
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

/// Read-only source of trend records
///
/// Implementations must hand back a consistent snapshot: an analysis call
/// owns the returned vector and never observes later mutations.
pub trait RecordStore {
    /// Fetch records, optionally filtered by platform and collection time
    fn fetch_records(
        &self,
        platform: Option<Platform>,
        range: Option<PeriodRange>,
    ) -> StoreResult<Vec<TrendRecord>>;
}

/// In-memory record store for tests and file-fed CLI runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<TrendRecord>,
}

impl MemoryStore {
    /// Create a store over the given records
    pub fn new(records: Vec<TrendRecord>) -> Self {
        Self { records }
    }

    /// Load trend records from a JSON array file
    pub fn from_json_file(path: &Path) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let records: Vec<TrendRecord> =
            serde_json::from_str(&content).map_err(|source| StoreError::Json {
                path: path.display().to_string(),
                source,
            })?;

        debug!(path = %path.display(), records = records.len(), "loaded trend records");
        Ok(Self::new(records))
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn fetch_records(
        &self,
        platform: Option<Platform>,
        range: Option<PeriodRange>,
    ) -> StoreResult<Vec<TrendRecord>> {
        let records = self
            .records
            .iter()
            .filter(|r| platform.is_none() || Some(r.platform) == platform)
            .filter(|r| range.map(|range| range.contains(r.collected_at)).unwrap_or(true))
            .cloned()
            .collect();
        Ok(records)
    }
}

/// Load content records (engagement inputs) from a JSON array file
pub fn load_content_records(path: &Path) -> StoreResult<Vec<ContentRecord>> {
    let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let records: Vec<ContentRecord> =
        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        })?;

    debug!(path = %path.display(), records = records.len(), "loaded content records");
    Ok(records)
}
