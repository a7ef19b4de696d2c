//! CART regression tree
//!
//! Squared-error splits, thresholds at midpoints between consecutive distinct
//! feature values, leaves predict the mean target. Used as the weak learner
//! for gradient boosting.

use crate::error::{PredictError, Result};

/// Variance below which a node is treated as pure
const PURE_NODE_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone)]
pub enum TreeNode {
    Leaf {
        value: f64,
        n_samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        /// Samples where feature <= threshold
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Leaves have depth 0
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn predict(&self, row: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value, .. } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold { &**left } else { &**right };
                }
            }
        }
    }
}

/// Regression tree with depth and sample-count limits
#[derive(Debug, Clone)]
pub struct RegressionTree {
    max_depth: usize,
    min_samples_split: usize,
    min_samples_leaf: usize,
    n_features: usize,
    root: Option<TreeNode>,
}

impl RegressionTree {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            min_samples_split: 2,
            min_samples_leaf: 1,
            n_features: 0,
            root: None,
        }
    }

    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split.max(2);
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf.max(1);
        self
    }

    /// Fit on `x` (rows of equal length) and targets `y`
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
        let n_features = x[0].len();
        if let Some(bad) = x.iter().find(|row| row.len() != n_features) {
            return Err(PredictError::InvalidFeatures {
                expected: n_features,
                actual: bad.len(),
            });
        }

        self.n_features = n_features;
        let indices: Vec<usize> = (0..x.len()).collect();
        self.root = Some(self.build(x, y, &indices, 0));
        Ok(())
    }

    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        let root = self.root.as_ref().ok_or(PredictError::ModelNotFitted)?;
        if row.len() != self.n_features {
            return Err(PredictError::InvalidFeatures {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        Ok(root.predict(row))
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, TreeNode::depth)
    }

    fn build(&self, x: &[Vec<f64>], y: &[f64], indices: &[usize], depth: usize) -> TreeNode {
        let n_samples = indices.len();
        let targets: Vec<f64> = indices.iter().map(|&i| y[i]).collect();
        let value = mean(&targets);

        if n_samples < self.min_samples_split
            || depth >= self.max_depth
            || variance(&targets) < PURE_NODE_EPSILON
        {
            return TreeNode::Leaf { value, n_samples };
        }

        let Some((feature, threshold)) = self.best_split(x, y, indices) else {
            return TreeNode::Leaf { value, n_samples };
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) =
            indices.iter().partition(|&&i| x[i][feature] <= threshold);

        TreeNode::Split {
            feature,
            threshold,
            left: Box::new(self.build(x, y, &left_idx, depth + 1)),
            right: Box::new(self.build(x, y, &right_idx, depth + 1)),
        }
    }

    /// Lowest summed squared error split over all features
    ///
    /// Features are scanned in order and the first best split wins ties, so
    /// the result is deterministic.
    fn best_split(&self, x: &[Vec<f64>], y: &[f64], indices: &[usize]) -> Option<(usize, f64)> {
        let n = indices.len();
        let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
        let parent_sse = total_sq - total_sum * total_sum / n as f64;

        let mut best: Option<(usize, f64, f64)> = None;

        for feature in 0..self.n_features {
            let mut order: Vec<(f64, f64)> = indices.iter().map(|&i| (x[i][feature], y[i])).collect();
            order.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;
            for k in 1..n {
                let (prev_x, prev_y) = order[k - 1];
                left_sum += prev_y;
                left_sq += prev_y * prev_y;

                if order[k].0 <= prev_x {
                    continue;
                }
                let n_left = k;
                let n_right = n - k;
                if n_left < self.min_samples_leaf || n_right < self.min_samples_leaf {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let sse = (left_sq - left_sum * left_sum / n_left as f64)
                    + (right_sq - right_sum * right_sum / n_right as f64);

                if best.map_or(true, |(_, _, best_sse)| sse < best_sse) {
                    let threshold = prev_x + (order[k].0 - prev_x) / 2.0;
                    best = Some((feature, threshold, sse));
                }
            }
        }

        best.filter(|&(_, _, sse)| sse < parent_sse)
            .map(|(feature, threshold, _)| (feature, threshold))
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn variance(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: &[f64]) -> Vec<Vec<f64>> {
        values.iter().map(|&v| vec![v]).collect()
    }

    #[test]
    fn test_step_function_split() {
        let x = column(&[1.0, 2.0, 3.0, 10.0, 11.0, 12.0]);
        let y = [5.0, 5.0, 5.0, 20.0, 20.0, 20.0];
        let mut tree = RegressionTree::new(3);
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.depth(), 1);
        assert!((tree.predict(&[2.5]).unwrap() - 5.0).abs() < 1e-12);
        assert!((tree.predict(&[9.0]).unwrap() - 20.0).abs() < 1e-12);
        match tree.root.as_ref().unwrap() {
            TreeNode::Split { threshold, .. } => assert!((threshold - 6.5).abs() < 1e-12),
            TreeNode::Leaf { .. } => panic!("expected split"),
        }
    }

    #[test]
    fn test_picks_informative_feature() {
        // Feature 0 is noise, feature 1 drives the target
        let x = vec![
            vec![3.0, 0.0],
            vec![1.0, 0.0],
            vec![2.0, 1.0],
            vec![0.0, 1.0],
        ];
        let y = [1.0, 1.0, 9.0, 9.0];
        let mut tree = RegressionTree::new(1);
        tree.fit(&x, &y).unwrap();

        match tree.root.as_ref().unwrap() {
            TreeNode::Split { feature, .. } => assert_eq!(*feature, 1),
            TreeNode::Leaf { .. } => panic!("expected split"),
        }
    }

    #[test]
    fn test_max_depth_respected() {
        let x = column(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let y = [1.0, 4.0, 9.0, 16.0, 25.0, 36.0, 49.0, 64.0];
        let mut tree = RegressionTree::new(2);
        tree.fit(&x, &y).unwrap();
        assert!(tree.depth() <= 2);
    }

    #[test]
    fn test_constant_target_is_leaf() {
        let x = column(&[1.0, 2.0, 3.0]);
        let mut tree = RegressionTree::new(3);
        tree.fit(&x, &[7.0, 7.0, 7.0]).unwrap();
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict(&[100.0]).unwrap(), 7.0);
    }

    #[test]
    fn test_identical_features_cannot_split() {
        let x = column(&[4.0, 4.0]);
        let mut tree = RegressionTree::new(3);
        tree.fit(&x, &[1.0, 3.0]).unwrap();
        assert_eq!(tree.depth(), 0);
        assert!((tree.predict(&[4.0]).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_samples_leaf() {
        let x = column(&[1.0, 2.0, 3.0, 4.0]);
        let y = [0.0, 10.0, 10.0, 10.0];
        let mut tree = RegressionTree::new(3).with_min_samples_leaf(2);
        tree.fit(&x, &y).unwrap();
        match tree.root.as_ref().unwrap() {
            TreeNode::Split { threshold, .. } => assert!((threshold - 2.5).abs() < 1e-12),
            TreeNode::Leaf { .. } => panic!("expected split"),
        }
    }

    #[test]
    fn test_errors() {
        let mut tree = RegressionTree::new(3);
        assert!(matches!(tree.predict(&[1.0]), Err(PredictError::ModelNotFitted)));
        assert!(matches!(tree.fit(&[], &[]), Err(PredictError::EmptyDataset)));
        assert!(matches!(
            tree.fit(&column(&[1.0]), &[1.0, 2.0]),
            Err(PredictError::LengthMismatch { .. })
        ));

        tree.fit(&column(&[1.0, 2.0]), &[1.0, 2.0]).unwrap();
        assert!(matches!(
            tree.predict(&[1.0, 2.0]),
            Err(PredictError::InvalidFeatures { expected: 1, actual: 2 })
        ));
    }
}
