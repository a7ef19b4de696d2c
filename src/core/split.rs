//! Seeded train/validation split

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{validate_fraction, PredictError, Result};

/// Shuffled index partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

/// Split `n_samples` indices into train and validation sets
///
/// Indices are shuffled with a `StdRng` seeded from `seed`; the validation set
/// takes the first `ceil(n * test_size)` shuffled indices, clamped so both
/// sides keep at least one sample.
pub fn train_validation_split(n_samples: usize, test_size: f64, seed: u64) -> Result<SplitIndices> {
    validate_fraction("test_size", test_size)?;
    if n_samples < 2 {
        return Err(PredictError::InvalidConfig(format!(
            "Need at least 2 samples to split, got {}",
            n_samples
        )));
    }

    let n_validation = ((n_samples as f64 * test_size).ceil() as usize).clamp(1, n_samples - 1);

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_validation);
    Ok(SplitIndices {
        train,
        validation: indices,
    })
}
