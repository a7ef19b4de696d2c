//! Historical Feature Extraction
//!
//! Reduce per-lap timing records to per-driver mean sector times (features)
//! and mean lap time (label).

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::models::{ExtractionSummary, HistoricalFeatureRow, HistoricalRecord, NUM_SECTORS};

/// Per-driver features and labels, keyed by short code
#[derive(Debug, Clone, Default)]
pub struct HistoricalFeatures {
    rows: BTreeMap<String, HistoricalFeatureRow>,
    labels: BTreeMap<String, f64>,
    summary: ExtractionSummary,
}

#[derive(Default)]
struct Accumulator {
    laps: usize,
    lap_sum: f64,
    sector_sums: [f64; NUM_SECTORS],
}

impl HistoricalFeatures {
    /// Aggregate raw lap records
    ///
    /// Laps missing any of the four durations are dropped before averaging; a
    /// driver left with no valid laps does not appear in the output.
    pub fn extract(records: &[HistoricalRecord]) -> Self {
        let mut acc: BTreeMap<&str, Accumulator> = BTreeMap::new();
        let mut discarded = 0usize;

        for record in records {
            let Some((lap, sectors)) = record.complete_secs() else {
                discarded += 1;
                continue;
            };

            let entry = acc.entry(record.code.as_str()).or_default();
            entry.laps += 1;
            entry.lap_sum += lap;
            for (sum, value) in entry.sector_sums.iter_mut().zip(sectors) {
                *sum += value;
            }
        }

        if discarded > 0 {
            debug!("Discarded {} lap record(s) with missing timing", discarded);
        }

        let mut rows = BTreeMap::new();
        let mut labels = BTreeMap::new();
        for (code, a) in acc {
            let n = a.laps as f64;
            rows.insert(
                code.to_string(),
                HistoricalFeatureRow {
                    code: code.to_string(),
                    sector_means: a.sector_sums.map(|s| s / n),
                    lap_count: a.laps,
                },
            );
            labels.insert(code.to_string(), a.lap_sum / n);
        }

        let summary = ExtractionSummary {
            total_records: records.len(),
            discarded_records: discarded,
            drivers: rows.len(),
        };
        info!(
            "Extracted features for {} driver(s) from {} lap(s) ({} discarded)",
            summary.drivers,
            summary.total_records - summary.discarded_records,
            summary.discarded_records
        );

        Self {
            rows,
            labels,
            summary,
        }
    }

    /// Feature row for a short code
    pub fn get(&self, code: &str) -> Option<&HistoricalFeatureRow> {
        self.rows.get(code)
    }

    /// Mean historical lap time for a short code
    pub fn label(&self, code: &str) -> Option<f64> {
        self.labels.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rows.contains_key(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Mean of each sector across all driver rows, None when there are no rows
    pub fn sector_averages(&self) -> Option<[f64; NUM_SECTORS]> {
        if self.rows.is_empty() {
            return None;
        }
        let n = self.rows.len() as f64;
        let mut sums = [0.0; NUM_SECTORS];
        for row in self.rows.values() {
            for (sum, value) in sums.iter_mut().zip(row.sector_means) {
                *sum += value;
            }
        }
        Some(sums.map(|s| s / n))
    }

    pub fn summary(&self) -> &ExtractionSummary {
        &self.summary
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
