//! Regression engine: trees, boosting, split and metrics

pub mod boosting;
pub mod metrics;
pub mod split;
pub mod tree;

// Re-export commonly used types
pub use boosting::GradientBoostingRegressor;
pub use metrics::mean_absolute_error;
pub use split::{train_validation_split, SplitIndices};
pub use tree::RegressionTree;
