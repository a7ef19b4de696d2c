//! CSV loading for historical laps, roster, and driver code tables

use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::data::identity::IdentityMap;
use crate::data::roster::Roster;
use crate::data::source::LapSource;
use crate::error::{PredictError, Result};
use crate::models::HistoricalRecord;

/// Lap CSV columns: driver code, lap time and sector times in seconds
const COL_DRIVER: &str = "driver";
const COL_LAP_TIME: &str = "lap_time";
const COL_SECTORS: [&str; 3] = ["sector1_time", "sector2_time", "sector3_time"];
const COL_QUALIFYING: &str = "qualifying_time";
const COL_CODE: &str = "code";

/// Historical laps read from a CSV export of a timing session
///
/// Empty cells, negative and non-finite values become missing durations and
/// are filtered out later during feature extraction.
#[derive(Debug, Clone)]
pub struct CsvLapSource {
    path: PathBuf,
}

impl CsvLapSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LapSource for CsvLapSource {
    fn load_laps(&self) -> Result<Vec<HistoricalRecord>> {
        let df = read_csv(&self.path)?;

        let driver_col = string_column(&df, COL_DRIVER)?;
        let lap_col = f64_column(&df, COL_LAP_TIME)?;
        let s1_col = f64_column(&df, COL_SECTORS[0])?;
        let s2_col = f64_column(&df, COL_SECTORS[1])?;
        let s3_col = f64_column(&df, COL_SECTORS[2])?;

        let mut records = Vec::with_capacity(df.height());
        let mut unattributed = 0usize;
        for i in 0..df.height() {
            // A lap without a driver code cannot be attributed
            let Some(code) = driver_col.get(i) else {
                unattributed += 1;
                continue;
            };
            records.push(HistoricalRecord {
                code: code.to_string(),
                lap_time: to_duration(lap_col.get(i)),
                sector_times: [
                    to_duration(s1_col.get(i)),
                    to_duration(s2_col.get(i)),
                    to_duration(s3_col.get(i)),
                ],
            });
        }

        if unattributed > 0 {
            warn!(
                "Skipped {} lap row(s) without a driver code in {:?}",
                unattributed, self.path
            );
        }
        info!("Loaded {} lap record(s) from {:?}", records.len(), self.path);
        Ok(records)
    }
}

/// Load a roster CSV with `driver` and `qualifying_time` columns
///
/// Every row is an entrant, so an empty cell is an error rather than a skip.
pub fn load_roster_csv<P: AsRef<Path>>(path: P) -> Result<Roster> {
    let df = read_csv(path.as_ref())?;
    let driver_col = string_column(&df, COL_DRIVER)?;
    let quali_col = f64_column(&df, COL_QUALIFYING)?;

    let mut entries = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let driver = driver_col
            .get(i)
            .ok_or_else(|| missing_cell(i, COL_DRIVER))?;
        let qualifying = quali_col
            .get(i)
            .ok_or_else(|| missing_cell(i, COL_QUALIFYING))?;
        entries.push((driver.to_string(), qualifying));
    }

    Roster::new(entries)
}

/// Load a driver code table CSV with `driver` and `code` columns
pub fn load_mapping_csv<P: AsRef<Path>>(path: P) -> Result<IdentityMap> {
    let df = read_csv(path.as_ref())?;
    let driver_col = string_column(&df, COL_DRIVER)?;
    let code_col = string_column(&df, COL_CODE)?;

    let mut map = IdentityMap::new();
    for i in 0..df.height() {
        if let (Some(driver), Some(code)) = (driver_col.get(i), code_col.get(i)) {
            if let Some(previous) = map.insert(driver, code) {
                if previous != code {
                    warn!(
                        "Conflicting codes for {}: {} replaced by {}",
                        driver, previous, code
                    );
                }
            }
        }
    }
    Ok(map)
}

fn missing_cell(row: usize, column: &str) -> PredictError {
    PredictError::InvalidRoster(format!("Row {} has no value in column {}", row + 1, column))
}

fn read_csv(path: &Path) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

/// Numeric column as f64 regardless of inferred integer/float type
fn f64_column(df: &DataFrame, name: &str) -> PolarsResult<Float64Chunked> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.as_materialized_series().f64()?.clone())
}

fn string_column(df: &DataFrame, name: &str) -> PolarsResult<StringChunked> {
    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(column.as_materialized_series().str()?.clone())
}

fn to_duration(seconds: Option<f64>) -> Option<Duration> {
    seconds.and_then(|s| Duration::try_from_secs_f64(s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_fixture(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("racepace_csv_loader_tests");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_to_duration() {
        assert_eq!(to_duration(Some(1.5)), Some(Duration::from_millis(1500)));
        assert_eq!(to_duration(Some(-0.1)), None);
        assert_eq!(to_duration(Some(f64::NAN)), None);
        assert_eq!(to_duration(None), None);
    }

    #[test]
    fn test_load_laps_with_missing_values() {
        let path = write_fixture(
            "laps.csv",
            "driver,lap_time,sector1_time,sector2_time,sector3_time\n\
             VER,95.5,30.1,35.2,30.2\n\
             NOR,,31.0,34.0,29.0\n\
             LEC,96,31,35,30\n",
        );
        let laps = CsvLapSource::new(&path).load_laps().unwrap();

        assert_eq!(laps.len(), 3);
        assert_eq!(laps[0].code, "VER");
        let (lap, sectors) = laps[0].complete_secs().unwrap();
        assert!((lap - 95.5).abs() < 1e-9);
        assert!((sectors[2] - 30.2).abs() < 1e-9);
        assert!(laps[1].lap_time.is_none());
        assert!(laps[1].complete_secs().is_none());
        assert!(laps[2].complete_secs().is_some());
    }

    #[test]
    fn test_load_roster_and_mapping() {
        let roster_path = write_fixture(
            "roster.csv",
            "driver,qualifying_time\nLando Norris,100.562\nOscar Piastri,100.647\n",
        );
        let mapping_path = write_fixture(
            "mapping.csv",
            "driver,code\nLando Norris,NOR\nOscar Piastri,PIA\n",
        );

        let roster = load_roster_csv(&roster_path).unwrap();
        let mapping = load_mapping_csv(&mapping_path).unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.entries()[1].driver, "Oscar Piastri");
        assert!((roster.entries()[0].qualifying_time - 100.562).abs() < 1e-9);
        assert_eq!(mapping.code_for("Oscar Piastri"), Some("PIA"));
    }

    #[test]
    fn test_roster_empty_cell_rejected() {
        let path = write_fixture(
            "roster_gap.csv",
            "driver,qualifying_time\nLando Norris,100.562\nOscar Piastri,\nMax Verstappen,100.9\n",
        );
        match load_roster_csv(&path) {
            Err(PredictError::InvalidRoster(msg)) => {
                assert!(msg.contains("Row 2"), "{}", msg);
                assert!(msg.contains(COL_QUALIFYING), "{}", msg);
            }
            other => panic!("expected InvalidRoster, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn test_lap_without_driver_skipped() {
        let path = write_fixture(
            "laps_no_driver.csv",
            "driver,lap_time,sector1_time,sector2_time,sector3_time\n\
             VER,95.5,30.1,35.2,30.2\n\
             ,96.0,31.0,35.0,30.0\n",
        );
        let laps = CsvLapSource::new(&path).load_laps().unwrap();
        assert_eq!(laps.len(), 1);
        assert_eq!(laps[0].code, "VER");
    }

    #[test]
    fn test_mapping_last_entry_wins() {
        let path = write_fixture(
            "mapping_conflict.csv",
            "driver,code\nCarlos Sainz,SAI\nCarlos Sainz,SAZ\n",
        );
        let mapping = load_mapping_csv(&path).unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.code_for("Carlos Sainz"), Some("SAZ"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let source = CsvLapSource::new("/nonexistent/racepace/laps.csv");
        assert!(source.load_laps().is_err());
    }
}
