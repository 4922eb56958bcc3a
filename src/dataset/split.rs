//! Train/test and fit/validation partitioning.
//!
//! Both splits keep the original order: shuffling happens once, in the loader.

use crate::backend::{Backend, Tensor1D};
use crate::error::{RegressionError, Result};

/// Splits an even-length tensor into two equal halves: `(first, second)`.
///
/// # Errors
/// [`RegressionError::ShapeMismatch`] for odd lengths.
pub fn split_even<B: Backend>(values: &Tensor1D<B>) -> Result<(Tensor1D<B>, Tensor1D<B>)> {
    let n = values.len();
    if n % 2 != 0 {
        return Err(RegressionError::ShapeMismatch {
            expected: "even length".to_string(),
            got: format!("length {}", n),
        });
    }
    let half = n / 2;
    Ok((values.slice(0..half), values.slice(half..n)))
}

/// Number of leading rows used for fitting when `fraction` of `n` rows is held out
/// for validation: `floor(n * (1 - fraction))`. The trailing rows form the
/// validation set.
///
/// # Errors
/// [`RegressionError::InvalidParameter`] unless `0 <= fraction < 1`.
pub fn validation_split_index(n: usize, fraction: f64) -> Result<usize> {
    if !(0.0..1.0).contains(&fraction) {
        return Err(RegressionError::InvalidParameter(format!(
            "validation split must be in [0, 1), got {}",
            fraction
        )));
    }
    Ok((n as f64 * (1.0 - fraction)).floor() as usize)
}

/// Training and testing halves of the normalized feature and label columns.
#[derive(Clone, Debug)]
pub struct Split<B: Backend> {
    pub train_features: Tensor1D<B>,
    pub train_labels: Tensor1D<B>,
    pub test_features: Tensor1D<B>,
    pub test_labels: Tensor1D<B>,
}

impl<B: Backend> Split<B> {
    /// Halves both columns; they must have the same even length.
    pub fn new(features: &Tensor1D<B>, labels: &Tensor1D<B>) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(RegressionError::ShapeMismatch {
                expected: format!("{} labels", features.len()),
                got: format!("{} labels", labels.len()),
            });
        }
        let (train_features, test_features) = split_even(features)?;
        let (train_labels, test_labels) = split_even(labels)?;
        Ok(Self {
            train_features,
            train_labels,
            test_features,
            test_labels,
        })
    }

    pub fn train_len(&self) -> usize {
        self.train_features.len()
    }

    pub fn test_len(&self) -> usize {
        self.test_features.len()
    }
}
