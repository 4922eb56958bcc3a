//! Dataset abstractions and data preparation.
//!
//! - [`Dataset`] gives uniform, batch-wise access to `(X, y)` pairs where `X` has shape
//!   `(n_samples, n_features)` and `y` has shape `(n_samples,)`.
//! - [`InMemoryDataset`] is the implementation used by the trainer.
//! - [`loader`] reads the raw housing samples, [`split`] partitions them.
//!
//! # Example
//!
//! ```rust
//! use housing_regression::backend::CpuBackend;
//! use housing_regression::dataset::{Dataset, InMemoryDataset};
//!
//! let ds = InMemoryDataset::<CpuBackend>::from_rows(
//!     vec![vec![1.0], vec![2.0], vec![3.0]],
//!     vec![2.0, 4.0, 6.0],
//! )
//! .unwrap();
//!
//! for batch in ds.batches(2) {
//!     let (x, y) = batch.unwrap();
//!     assert_eq!(x.rows(), y.len());
//! }
//! ```

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::error::Result;
use std::marker::PhantomData;
use std::ops::Range;

pub mod loader;
pub mod memory;
pub mod split;

pub use self::loader::{HousingCsvLoader, Sample};
pub use self::memory::InMemoryDataset;
pub use self::split::{split_even, validation_split_index, Split};

/// Source of `(X, y)` training pairs.
pub trait Dataset<B: Backend> {
    /// Number of samples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads the samples in `range` as tensors.
    ///
    /// # Errors
    ///
    /// Returns [`RegressionError::ShapeMismatch`](crate::error::RegressionError::ShapeMismatch)
    /// when `range` reaches past the end of the dataset.
    fn get_batch(&self, range: Range<usize>) -> Result<(Tensor2D<B>, Tensor1D<B>)>;

    /// Iterates over consecutive batches of `batch_size` samples; the last batch may
    /// be smaller. A `batch_size` of zero yields nothing.
    fn batches(&self, batch_size: usize) -> DatasetBatchIter<'_, B, Self>
    where
        Self: Sized,
    {
        DatasetBatchIter {
            dataset: self,
            batch_size,
            current: 0,
            _backend: PhantomData,
        }
    }
}

/// Iterator over dataset batches, created by [`Dataset::batches`].
///
/// Data is fetched lazily on `next()`. Errors from `get_batch` are yielded as
/// `Some(Err(e))`; iteration ends once every sample was consumed.
pub struct DatasetBatchIter<'a, B: Backend, D: ?Sized> {
    dataset: &'a D,
    batch_size: usize,
    /// Index of the next sample to yield.
    current: usize,
    _backend: PhantomData<B>,
}

impl<B: Backend, D: Dataset<B>> Iterator for DatasetBatchIter<'_, B, D> {
    type Item = Result<(Tensor2D<B>, Tensor1D<B>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.dataset.len();
        if self.batch_size == 0 || self.current >= total {
            return None;
        }

        let end = (self.current + self.batch_size).min(total);
        let range = self.current..end;
        self.current = end;

        Some(self.dataset.get_batch(range))
    }
}
