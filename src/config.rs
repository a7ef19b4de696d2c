//! Trainer configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{validate_fraction, PredictError, Result};

/// Fixed hyperparameters and seed for one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Number of boosting stages
    pub n_estimators: usize,
    /// Shrinkage applied to each tree
    pub learning_rate: f64,
    /// Maximum depth of each tree
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Fraction of common entrants held out for validation
    pub test_size: f64,
    /// Seed for the train/validation shuffle
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
            test_size: 0.2,
            seed: 1226,
        }
    }
}

impl TrainerConfig {
    /// Load from a JSON file; absent fields keep their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(PredictError::InvalidConfig(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(PredictError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_depth == 0 {
            return Err(PredictError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(PredictError::InvalidConfig(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        if self.min_samples_leaf == 0 {
            return Err(PredictError::InvalidConfig(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        validate_fraction("test_size", self.test_size)
    }
}
