//! Race time prediction and ranking
//!
//! Scores every roster entrant (measured or imputed features) and orders them
//! by ascending predicted lap time.

use tracing::debug;

use crate::error::Result;
use crate::models::{PredictionRow, RankedPrediction};
use crate::trainer::TrainedModel;

/// Applies a trained model to the full prediction table
pub struct Predictor<'a> {
    model: &'a TrainedModel,
}

impl<'a> Predictor<'a> {
    pub fn new(model: &'a TrainedModel) -> Self {
        Self { model }
    }

    /// Predicted lap time for each row, in input order
    pub fn predict_rows(&self, rows: &[PredictionRow]) -> Result<Vec<f64>> {
        rows.iter()
            .map(|row| {
                let predicted = self.model.predict(&row.features())?;
                debug!("{}: predicted {:.3}s", row.driver, predicted);
                Ok(predicted)
            })
            .collect()
    }

    /// Predict and rank, fastest first
    pub fn rank(&self, rows: Vec<PredictionRow>) -> Result<Vec<RankedPrediction>> {
        let predicted = self.predict_rows(&rows)?;
        Ok(rank_by_time(
            rows.into_iter()
                .zip(predicted)
                .map(|(row, time)| (row.driver, time, row.imputed)),
        ))
    }
}

/// Sort (driver, time, imputed) ascending by time
///
/// The sort is stable: equal times keep their input order.
pub fn rank_by_time<I>(entries: I) -> Vec<RankedPrediction>
where
    I: IntoIterator<Item = (String, f64, bool)>,
{
    let mut ranked: Vec<(String, f64, bool)> = entries.into_iter().collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, (driver, predicted_time, imputed))| RankedPrediction {
            position: i + 1,
            driver,
            predicted_time,
            imputed,
        })
        .collect()
}
