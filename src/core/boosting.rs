//! Gradient Boosting Regressor
//!
//! Squared-error gradient boosting with regression trees as weak learners.
//!
//! # Algorithm
//!
//! 1. Initialize with the mean target
//! 2. For each boosting iteration:
//!    - Compute residuals `y - F(x)` (negative gradient of squared error)
//!    - Fit a shallow regression tree to the residuals
//!    - Update `F(x) += learning_rate * tree(x)`
//! 3. Final prediction = initial value + sum of scaled tree outputs

use tracing::debug;

use super::tree::{mean, RegressionTree};
use crate::error::{PredictError, Result};

#[derive(Debug, Clone)]
pub struct GradientBoostingRegressor {
    n_estimators: usize,
    learning_rate: f64,
    max_depth: usize,
    min_samples_split: usize,
    min_samples_leaf: usize,
    init_prediction: f64,
    n_features: Option<usize>,
    estimators: Vec<RegressionTree>,
}

impl GradientBoostingRegressor {
    /// Defaults: 100 trees, learning rate 0.1, depth 3
    pub fn new() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_split: 2,
            min_samples_leaf: 1,
            init_prediction: 0.0,
            n_features: None,
            estimators: Vec::new(),
        }
    }

    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        if x.len() != y.len() {
            return Err(PredictError::LengthMismatch {
                features: x.len(),
                labels: y.len(),
            });
        }
        if x.is_empty() {
            return Err(PredictError::EmptyDataset);
        }

        self.init_prediction = mean(y);
        self.estimators = Vec::with_capacity(self.n_estimators);
        let mut raw_predictions = vec![self.init_prediction; y.len()];

        for stage in 0..self.n_estimators {
            let residuals: Vec<f64> = y
                .iter()
                .zip(&raw_predictions)
                .map(|(yi, fi)| yi - fi)
                .collect();

            let mut tree = RegressionTree::new(self.max_depth)
                .with_min_samples_split(self.min_samples_split)
                .with_min_samples_leaf(self.min_samples_leaf);
            tree.fit(x, &residuals)?;

            for (row, raw) in x.iter().zip(raw_predictions.iter_mut()) {
                *raw += self.learning_rate * tree.predict(row)?;
            }
            self.estimators.push(tree);

            if stage % 50 == 0 {
                let loss = residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64;
                debug!("Boosting stage {}: training MSE {:.6}", stage, loss);
            }
        }

        self.n_features = Some(x[0].len());
        Ok(())
    }

    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        let n_features = self.n_features.ok_or(PredictError::ModelNotFitted)?;
        if row.len() != n_features {
            return Err(PredictError::InvalidFeatures {
                expected: n_features,
                actual: row.len(),
            });
        }

        let mut value = self.init_prediction;
        for tree in &self.estimators {
            value += self.learning_rate * tree.predict(row)?;
        }
        Ok(value)
    }

    pub fn predict_batch(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        x.iter().map(|row| self.predict(row)).collect()
    }

    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }
}

impl Default for GradientBoostingRegressor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64, (i % 3) as f64]).collect();
        let y: Vec<f64> = x.iter().map(|r| 90.0 + 0.5 * r[0]).collect();
        (x, y)
    }

    #[test]
    fn test_fits_training_data() {
        let (x, y) = linear_data();
        let mut model = GradientBoostingRegressor::new().with_n_estimators(200);
        model.fit(&x, &y).unwrap();

        let preds = model.predict_batch(&x).unwrap();
        let mae: f64 =
            preds.iter().zip(&y).map(|(p, t)| (p - t).abs()).sum::<f64>() / y.len() as f64;
        assert!(mae < 0.25, "training MAE too high: {}", mae);
    }

    #[test]
    fn test_zero_estimators_predicts_mean() {
        let (x, y) = linear_data();
        let mut model = GradientBoostingRegressor::new().with_n_estimators(0);
        model.fit(&x, &y).unwrap();
        let expected = y.iter().sum::<f64>() / y.len() as f64;
        assert!((model.predict(&x[0]).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_single_sample() {
        let mut model = GradientBoostingRegressor::new();
        model.fit(&[vec![100.0, 30.0]], &[95.0]).unwrap();
        assert!((model.predict(&[120.0, 10.0]).unwrap() - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let (x, y) = linear_data();
        let mut a = GradientBoostingRegressor::new();
        let mut b = GradientBoostingRegressor::new();
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        for row in &x {
            assert_eq!(
                a.predict(row).unwrap().to_bits(),
                b.predict(row).unwrap().to_bits()
            );
        }
    }

    #[test]
    fn test_unfitted_and_shape_errors() {
        let model = GradientBoostingRegressor::new();
        assert!(matches!(model.predict(&[1.0]), Err(PredictError::ModelNotFitted)));

        let (x, y) = linear_data();
        let mut model = GradientBoostingRegressor::new().with_n_estimators(5);
        model.fit(&x, &y).unwrap();
        assert!(matches!(
            model.predict(&[1.0]),
            Err(PredictError::InvalidFeatures { expected: 2, actual: 1 })
        ));
    }
}
