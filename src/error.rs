//! Error types for the prediction pipeline

use polars::prelude::PolarsError;
use thiserror::Error;

/// Pipeline errors
///
/// Per-record and per-entrant data problems (unmapped names, laps with a
/// missing sector) are absorbed by the pipeline and reported in summaries.
/// Only problems that leave the training set structurally unusable end up here.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(
        "Insufficient training data: {count} common entrant(s) {entrants:?}, at least 2 required"
    )]
    InsufficientTrainingData { count: usize, entrants: Vec<String> },

    #[error(
        "No historical features to fall back on: {discarded} of {total_records} lap record(s) discarded"
    )]
    FeatureFallbackExhausted {
        total_records: usize,
        discarded: usize,
    },

    #[error("Duplicate roster entrant: {0}")]
    DuplicateEntrant(String),

    #[error("Invalid roster entry: {0}")]
    InvalidRoster(String),

    #[error("Invalid trainer config: {0}")]
    InvalidConfig(String),

    #[error("Feature vector length mismatch: expected {expected}, got {actual}")]
    InvalidFeatures { expected: usize, actual: usize },

    #[error("Feature and label counts differ: {features} feature row(s), {labels} label(s)")]
    LengthMismatch { features: usize, labels: usize },

    #[error("Cannot fit a model on an empty dataset")]
    EmptyDataset,

    #[error("Model has not been fitted")]
    ModelNotFitted,

    #[error("Data source error: {0}")]
    DataSource(#[from] PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PredictError>;

/// Validate a qualifying lap time in seconds
pub fn validate_lap_seconds(name: &str, seconds: f64) -> Result<()> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(PredictError::InvalidRoster(format!(
            "Qualifying time for {} must be a positive number of seconds, got {}",
            name, seconds
        )));
    }
    Ok(())
}

/// Validate that a fraction lies strictly between 0 and 1
pub fn validate_fraction(field: &str, value: f64) -> Result<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(PredictError::InvalidConfig(format!(
            "{} must be between 0 and 1 (exclusive), got {}",
            field, value
        )));
    }
    Ok(())
}
