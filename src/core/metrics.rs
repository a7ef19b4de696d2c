//! Regression error metrics

/// Mean absolute error between targets and predictions
///
/// Returns 0.0 for empty input. Pairs are zipped, so extra elements on either
/// side are ignored.
pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len().min(y_pred.len());
    if n == 0 {
        return 0.0;
    }
    y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).abs())
        .sum::<f64>()
        / n as f64
}
