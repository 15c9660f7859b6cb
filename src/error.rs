//! Error types for loading and analysing post exports.
//!
//! Only structural problems are errors: a bad date, a missing column or an
//! unreadable file aborts the whole load. Per-value defects (numbers, missing
//! locations, unscoreable text) are degraded to defaults where they occur and
//! never show up here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the analytics pipeline.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The input file could not be opened or an export could not be written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The CSV reader rejected a record (bad UTF-8, broken quoting, ...) or a
    /// CSV export could not be written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    /// A date cell could not be parsed. `row` is 1-based and excludes the header.
    #[error("Unparsable date {value:?} in row {row}")]
    InvalidDate { row: usize, value: String },

    /// The n-gram window is empty or inverted.
    #[error("Invalid n-gram range: min {min} / max {max}")]
    InvalidNgramRange { min: usize, max: usize },

    /// JSON export failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyticsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures that stem from the shape of the input data rather
    /// than from the environment.
    pub fn is_data_format(&self) -> bool {
        matches!(
            self,
            Self::Csv(_) | Self::MissingColumn(_) | Self::InvalidDate { .. }
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
