//! Racepace - race lap time prediction from qualifying pace
//!
//! This library provides:
//! - Driver identity reconciliation between full names and timing codes
//! - Per-driver sector and lap time features from historical laps
//! - Alignment of the upcoming roster with history, with mean imputation
//! - Gradient-boosted regression with a seeded validation split
//! - Ranked race time predictions and validation MAE
//!
//! # Example
//!
//! ```no_run
//! use racepace::data::{belgian_gp_2025_roster, driver_codes_2025, CsvLapSource};
//! use racepace::{Pipeline, TrainerConfig};
//!
//! let pipeline = Pipeline::new(TrainerConfig::default())?;
//! let report = pipeline.run(
//!     &CsvLapSource::new("data/belgium_2024_laps.csv"),
//!     belgian_gp_2025_roster(),
//!     &driver_codes_2025(),
//! )?;
//! for entry in &report.rankings {
//!     println!("{} {:.3}", entry.driver, entry.predicted_time);
//! }
//! println!("MAE: {:.2}s", report.validation_mae);
//! # Ok::<(), racepace::PredictError>(())
//! ```

pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod predictor;
pub mod trainer;

// Re-export commonly used types
pub use config::TrainerConfig;
pub use data::{IdentityMap, LapSource, Roster};
pub use error::{PredictError, Result};
pub use models::{
    AlignedTrainingRow, HistoricalFeatureRow, HistoricalRecord, PredictionReport, PredictionRow,
    RankedPrediction, UpcomingEntrantRow,
};
pub use pipeline::Pipeline;
pub use predictor::Predictor;
pub use trainer::{RegressionTrainer, TrainedModel};
