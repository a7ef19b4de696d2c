//! Historical lap data access
//!
//! The pipeline never fetches or caches timing data itself; callers hand it a
//! `LapSource` that yields already-materialized lap records.

use crate::error::Result;
use crate::models::HistoricalRecord;

/// Provider of historical per-lap timing records
pub trait LapSource {
    fn load_laps(&self) -> Result<Vec<HistoricalRecord>>;
}

/// Lap records held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryLapSource {
    records: Vec<HistoricalRecord>,
}

impl InMemoryLapSource {
    pub fn new(records: Vec<HistoricalRecord>) -> Self {
        Self { records }
    }
}

impl LapSource for InMemoryLapSource {
    fn load_laps(&self) -> Result<Vec<HistoricalRecord>> {
        Ok(self.records.clone())
    }
}

impl From<Vec<HistoricalRecord>> for InMemoryLapSource {
    fn from(records: Vec<HistoricalRecord>) -> Self {
        Self::new(records)
    }
}
