//! Regression training on aligned rows
//!
//! Holds out a seeded validation split, fits gradient boosting on the rest and
//! reports validation MAE.

use std::collections::BTreeSet;
use tracing::info;

use crate::config::TrainerConfig;
use crate::core::{mean_absolute_error, train_validation_split, GradientBoostingRegressor};
use crate::error::{PredictError, Result};
use crate::models::{AlignedTrainingRow, NUM_FEATURES};

/// Minimum distinct common entrants needed for a train/validation split
pub const MIN_COMMON_ENTRANTS: usize = 2;

/// Fits a `TrainedModel` from a fixed configuration
pub struct RegressionTrainer {
    config: TrainerConfig,
}

impl RegressionTrainer {
    pub fn new(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Split, fit on the training partition, score on the validation partition
    ///
    /// Two roster names sharing a code yield two rows with one label, so the
    /// size check counts distinct codes rather than rows.
    pub fn train(&self, rows: &[AlignedTrainingRow]) -> Result<TrainedModel> {
        let codes: BTreeSet<&str> = rows.iter().map(|r| r.code.as_str()).collect();
        if codes.len() < MIN_COMMON_ENTRANTS {
            return Err(PredictError::InsufficientTrainingData {
                count: codes.len(),
                entrants: codes.into_iter().map(str::to_string).collect(),
            });
        }

        let split = train_validation_split(rows.len(), self.config.test_size, self.config.seed)?;
        let (x_train, y_train) = to_matrix(rows, &split.train);
        let (x_valid, y_valid) = to_matrix(rows, &split.validation);
        info!(
            "Split {} common driver(s): {} train, {} validation (seed {})",
            rows.len(),
            x_train.len(),
            x_valid.len(),
            self.config.seed
        );

        let mut model = GradientBoostingRegressor::new()
            .with_n_estimators(self.config.n_estimators)
            .with_learning_rate(self.config.learning_rate)
            .with_max_depth(self.config.max_depth)
            .with_min_samples_split(self.config.min_samples_split)
            .with_min_samples_leaf(self.config.min_samples_leaf);
        model.fit(&x_train, &y_train)?;

        let training_mae = mean_absolute_error(&y_train, &model.predict_batch(&x_train)?);
        let validation_mae = mean_absolute_error(&y_valid, &model.predict_batch(&x_valid)?);
        info!(
            "Fitted {} trees: training MAE {:.3}s, validation MAE {:.3}s",
            model.n_estimators(),
            training_mae,
            validation_mae
        );

        Ok(TrainedModel {
            model,
            training_mae,
            validation_mae,
            train_codes: split.train.iter().map(|&i| rows[i].code.clone()).collect(),
            validation_codes: split.validation.iter().map(|&i| rows[i].code.clone()).collect(),
        })
    }
}

fn to_matrix(rows: &[AlignedTrainingRow], indices: &[usize]) -> (Vec<Vec<f64>>, Vec<f64>) {
    indices
        .iter()
        .map(|&i| (rows[i].features().to_vec(), rows[i].label))
        .unzip()
}

/// Fitted model plus its held-out accuracy
#[derive(Debug, Clone)]
pub struct TrainedModel {
    model: GradientBoostingRegressor,
    training_mae: f64,
    validation_mae: f64,
    train_codes: Vec<String>,
    validation_codes: Vec<String>,
}

impl TrainedModel {
    /// Predicted race lap time in seconds for one feature vector
    pub fn predict(&self, features: &[f64; NUM_FEATURES]) -> Result<f64> {
        self.model.predict(features)
    }

    pub fn predict_batch(&self, features: &[[f64; NUM_FEATURES]]) -> Result<Vec<f64>> {
        features.iter().map(|f| self.predict(f)).collect()
    }

    pub fn validation_mae(&self) -> f64 {
        self.validation_mae
    }

    pub fn training_mae(&self) -> f64 {
        self.training_mae
    }

    pub fn train_codes(&self) -> &[String] {
        &self.train_codes
    }

    pub fn validation_codes(&self) -> &[String] {
        &self.validation_codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, qualifying: f64, sectors: [f64; 3], label: f64) -> AlignedTrainingRow {
        AlignedTrainingRow {
            driver: format!("Driver {}", code),
            code: code.to_string(),
            qualifying_time: qualifying,
            sector_means: sectors,
            label,
        }
    }

    fn grid(n: usize) -> Vec<AlignedTrainingRow> {
        (0..n)
            .map(|i| {
                let offset = i as f64 * 0.1;
                row(
                    &format!("D{:02}", i),
                    100.0 + offset,
                    [30.0 + offset, 35.0, 28.0 + offset],
                    95.0 + 2.0 * offset,
                )
            })
            .collect()
    }

    #[test]
    fn test_insufficient_training_data() {
        let trainer = RegressionTrainer::new(TrainerConfig::default()).unwrap();

        let err = trainer.train(&[]).unwrap_err();
        assert!(matches!(err, PredictError::InsufficientTrainingData { count: 0, .. }));

        let err = trainer.train(&grid(1)).unwrap_err();
        match err {
            PredictError::InsufficientTrainingData { count, entrants } => {
                assert_eq!(count, 1);
                assert_eq!(entrants, vec!["D00".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_shared_code_counts_once() {
        let trainer = RegressionTrainer::new(TrainerConfig::default()).unwrap();
        let mut alias = row("D00", 100.0, [30.0, 35.0, 28.0], 95.0);
        alias.driver = "Alias of D00".to_string();
        let rows = vec![row("D00", 100.0, [30.0, 35.0, 28.0], 95.0), alias];

        match trainer.train(&rows).unwrap_err() {
            PredictError::InsufficientTrainingData { count, entrants } => {
                assert_eq!(count, 1);
                assert_eq!(entrants, vec!["D00".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_two_rows_train() {
        let trainer = RegressionTrainer::new(TrainerConfig::default()).unwrap();
        let model = trainer.train(&grid(2)).unwrap();
        assert_eq!(model.train_codes().len(), 1);
        assert_eq!(model.validation_codes().len(), 1);
        assert!(model.validation_mae().is_finite());
    }

    #[test]
    fn test_split_partitions_codes() {
        let trainer = RegressionTrainer::new(TrainerConfig::default()).unwrap();
        let model = trainer.train(&grid(10)).unwrap();
        assert_eq!(model.validation_codes().len(), 2);
        assert_eq!(model.train_codes().len(), 8);
        for code in model.validation_codes() {
            assert!(!model.train_codes().contains(code));
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let trainer = RegressionTrainer::new(TrainerConfig::default()).unwrap();
        let a = trainer.train(&grid(12)).unwrap();
        let b = trainer.train(&grid(12)).unwrap();
        assert_eq!(a.validation_mae().to_bits(), b.validation_mae().to_bits());
        assert_eq!(a.validation_codes(), b.validation_codes());
        let probe = [100.55, 30.55, 35.0, 28.55];
        assert_eq!(
            a.predict(&probe).unwrap().to_bits(),
            b.predict(&probe).unwrap().to_bits()
        );
    }

    #[test]
    fn test_prediction_in_label_range() {
        let trainer = RegressionTrainer::new(TrainerConfig::default()).unwrap();
        let rows = grid(10);
        let model = trainer.train(&rows).unwrap();
        let pred = model.predict(&rows[5].features()).unwrap();
        assert!((94.5..=97.3).contains(&pred), "prediction {} out of range", pred);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TrainerConfig {
            n_estimators: 0,
            ..Default::default()
        };
        assert!(RegressionTrainer::new(config).is_err());
    }
}
