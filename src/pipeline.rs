//! End-to-end prediction pipeline
//!
//! laps -> per-driver features -> aligned training/prediction tables ->
//! trained model -> ranked predictions. Each stage runs to completion before
//! the next one starts and hands its output along by value.

use tracing::info;

use crate::config::TrainerConfig;
use crate::data::{align, AlignedDataset, HistoricalFeatures, IdentityMap, LapSource, Roster};
use crate::error::Result;
use crate::models::PredictionReport;
use crate::predictor::Predictor;
use crate::trainer::RegressionTrainer;

pub struct Pipeline {
    trainer: RegressionTrainer,
}

impl Pipeline {
    pub fn new(config: TrainerConfig) -> Result<Self> {
        Ok(Self {
            trainer: RegressionTrainer::new(config)?,
        })
    }

    /// Load laps, extract features and align them with the roster
    pub fn prepare(
        &self,
        source: &dyn LapSource,
        roster: Roster,
        identity: &IdentityMap,
    ) -> Result<(HistoricalFeatures, AlignedDataset)> {
        let laps = source.load_laps()?;
        let features = HistoricalFeatures::extract(&laps);
        let aligned = align(roster, identity, &features)?;
        Ok((features, aligned))
    }

    /// Run every stage and build the report
    pub fn run(
        &self,
        source: &dyn LapSource,
        roster: Roster,
        identity: &IdentityMap,
    ) -> Result<PredictionReport> {
        let (features, aligned) = self.prepare(source, roster, identity)?;
        let AlignedDataset {
            training,
            prediction,
            summary,
        } = aligned;

        let model = self.trainer.train(&training)?;
        let rankings = Predictor::new(&model).rank(prediction.clone())?;

        if let Some(winner) = rankings.first() {
            info!(
                "Predicted winner: {} ({:.3}s)",
                winner.driver, winner.predicted_time
            );
        }

        Ok(PredictionReport {
            rankings,
            validation_mae: model.validation_mae(),
            training_mae: model.training_mae(),
            train_size: model.train_codes().len(),
            validation_size: model.validation_codes().len(),
            extraction: features.summary().clone(),
            alignment: summary,
            prediction_table: prediction,
        })
    }
}
