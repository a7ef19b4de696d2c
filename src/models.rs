//! Data model shared by the pipeline stages

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of timed sectors per lap
pub const NUM_SECTORS: usize = 3;
/// Number of model features: qualifying time + 3 sector means
pub const NUM_FEATURES: usize = 1 + NUM_SECTORS;

/// One historical lap for one driver
///
/// Any duration may be missing (pit laps, red flags, timing gaps).
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRecord {
    pub code: String,
    pub lap_time: Option<Duration>,
    pub sector_times: [Option<Duration>; NUM_SECTORS],
}

impl HistoricalRecord {
    /// Build a fully-timed lap from seconds
    pub fn from_secs(code: &str, lap_time: f64, sectors: [f64; NUM_SECTORS]) -> Self {
        Self {
            code: code.to_string(),
            lap_time: Duration::try_from_secs_f64(lap_time).ok(),
            sector_times: sectors.map(|s| Duration::try_from_secs_f64(s).ok()),
        }
    }

    /// Lap and sector times in seconds, or None if any is missing
    pub fn complete_secs(&self) -> Option<(f64, [f64; NUM_SECTORS])> {
        let lap = self.lap_time?.as_secs_f64();
        let [s1, s2, s3] = self.sector_times;
        Some((lap, [s1?.as_secs_f64(), s2?.as_secs_f64(), s3?.as_secs_f64()]))
    }
}

/// Mean sector times for one driver over their valid historical laps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalFeatureRow {
    pub code: String,
    pub sector_means: [f64; NUM_SECTORS],
    pub lap_count: usize,
}

/// One confirmed entrant for the upcoming event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingEntrantRow {
    pub driver: String,
    pub qualifying_time: f64,
    /// Short code, None until reconciled or when no mapping exists
    pub code: Option<String>,
}

/// Training example for a driver present in both datasets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedTrainingRow {
    pub driver: String,
    pub code: String,
    pub qualifying_time: f64,
    pub sector_means: [f64; NUM_SECTORS],
    /// Mean historical lap time for `code`
    pub label: f64,
}

impl AlignedTrainingRow {
    pub fn features(&self) -> [f64; NUM_FEATURES] {
        feature_vector(self.qualifying_time, &self.sector_means)
    }
}

/// Prediction-table row for any roster entrant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub driver: String,
    pub code: Option<String>,
    pub qualifying_time: f64,
    pub sector_means: [f64; NUM_SECTORS],
    /// True when one or more sector means came from the historical average
    pub imputed: bool,
}

impl PredictionRow {
    pub fn features(&self) -> [f64; NUM_FEATURES] {
        feature_vector(self.qualifying_time, &self.sector_means)
    }
}

/// Model input order: qualifying, sector 1, sector 2, sector 3
pub fn feature_vector(qualifying_time: f64, sectors: &[f64; NUM_SECTORS]) -> [f64; NUM_FEATURES] {
    [qualifying_time, sectors[0], sectors[1], sectors[2]]
}

/// A roster entrant with its predicted race lap time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPrediction {
    pub position: usize,
    pub driver: String,
    pub predicted_time: f64,
    pub imputed: bool,
}

/// Counts from historical feature extraction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub total_records: usize,
    pub discarded_records: usize,
    pub drivers: usize,
}

/// Coverage of the roster by historical data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentSummary {
    /// Roster names with no short code mapping
    pub unmapped: Vec<String>,
    /// Roster names whose sector features were imputed
    pub imputed: Vec<String>,
    /// Sorted short codes used for training
    pub common_entrants: Vec<String>,
}

/// Final pipeline output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    pub rankings: Vec<RankedPrediction>,
    pub validation_mae: f64,
    pub training_mae: f64,
    pub train_size: usize,
    pub validation_size: usize,
    pub extraction: ExtractionSummary,
    pub alignment: AlignmentSummary,
    /// Model inputs for every roster entrant, in roster order
    pub prediction_table: Vec<PredictionRow>,
}

impl PredictionReport {
    pub fn common_entrant_count(&self) -> usize {
        self.alignment.common_entrants.len()
    }

    pub fn winner(&self) -> Option<&RankedPrediction> {
        self.rankings.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_secs() {
        let rec = HistoricalRecord::from_secs("VER", 95.0, [30.0, 35.0, 30.0]);
        let (lap, sectors) = rec.complete_secs().unwrap();
        assert!((lap - 95.0).abs() < 1e-9);
        assert!((sectors[1] - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_complete_secs_missing_sector() {
        let mut rec = HistoricalRecord::from_secs("VER", 95.0, [30.0, 35.0, 30.0]);
        rec.sector_times[2] = None;
        assert!(rec.complete_secs().is_none());
    }

    #[test]
    fn test_negative_seconds_become_missing() {
        let rec = HistoricalRecord::from_secs("VER", -1.0, [30.0, 35.0, 30.0]);
        assert!(rec.lap_time.is_none());
        assert!(rec.complete_secs().is_none());
    }

    #[test]
    fn test_feature_vector_order() {
        let row = AlignedTrainingRow {
            driver: "Max Verstappen".to_string(),
            code: "VER".to_string(),
            qualifying_time: 100.9,
            sector_means: [30.0, 35.0, 28.0],
            label: 95.0,
        };
        assert_eq!(row.features(), [100.9, 30.0, 35.0, 28.0]);
    }
}
