use super::tensor1d::Tensor1D;
use crate::backend::Backend;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

/// Backend-typed 2D tensor (feature matrix, one sample per row).
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Clone for Tensor2D<B> {
    fn clone(&self) -> Self {
        Self::from_raw(self.data.clone())
    }
}

impl<B: Backend> fmt::Debug for Tensor2D<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tensor2D").field(&self.data).finish()
    }
}

impl<B: Backend> Tensor2D<B> {
    /// Builds a matrix from row-major `data`.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        Self::from_raw(B::from_vec_2d(data, rows, cols))
    }

    pub(crate) fn from_raw(data: B::Tensor2D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        B::shape_2d(&self.data)
    }

    pub fn rows(&self) -> usize {
        self.shape().0
    }

    /// Matrix-vector product `self · v`.
    pub fn dot(&self, v: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D::from_raw(B::matvec(&self.data, &v.data))
    }

    /// Transposed product `selfᵀ · v`.
    pub fn tdot(&self, v: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D::from_raw(B::matvec_transposed(&self.data, &v.data))
    }

    /// Copy of the rows in `range`.
    pub fn slice_rows(&self, range: Range<usize>) -> Self {
        Self::from_raw(B::slice_rows_2d(&self.data, range))
    }

    /// Row-major host copy.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_2d(&self.data)
    }
}
