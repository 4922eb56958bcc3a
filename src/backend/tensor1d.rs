use super::scalar::Scalar;
use super::tensor2d::Tensor2D;
use crate::backend::Backend;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

/// Backend-typed 1D tensor.
///
/// Wraps `B::Tensor1D`; every operation delegates to the backend. Use
/// [`Tensor1D::to_vec`] to get host values back.
///
/// # Example
/// ```
/// use housing_regression::backend::{CpuBackend, Scalar, Tensor1D};
///
/// let x: Tensor1D<CpuBackend> = Tensor1D::new(vec![1.0, 2.0, 3.0]);
/// let y = x.scale(&Scalar::new(2.0));
/// assert_eq!(y.to_vec(), vec![2.0, 4.0, 6.0]);
/// ```
pub struct Tensor1D<B: Backend> {
    pub(crate) data: B::Tensor1D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Clone for Tensor1D<B> {
    fn clone(&self) -> Self {
        Self::from_raw(self.data.clone())
    }
}

impl<B: Backend> fmt::Debug for Tensor1D<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tensor1D").field(&self.data).finish()
    }
}

impl<B: Backend> Tensor1D<B> {
    pub fn new(data: Vec<f64>) -> Self {
        Self::from_raw(B::from_vec_1d(data))
    }

    pub fn zeros(len: usize) -> Self {
        Self::from_raw(B::zeros_1d(len))
    }

    pub(crate) fn from_raw(data: B::Tensor1D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        B::len_1d(&self.data)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element-wise `self + other`.
    pub fn add(&self, other: &Self) -> Self {
        Self::from_raw(B::add_1d(&self.data, &other.data))
    }

    /// Element-wise `self - other`.
    pub fn sub(&self, other: &Self) -> Self {
        Self::from_raw(B::sub_1d(&self.data, &other.data))
    }

    /// Element-wise product.
    pub fn mul(&self, other: &Self) -> Self {
        Self::from_raw(B::mul_1d(&self.data, &other.data))
    }

    pub fn scale(&self, s: &Scalar<B>) -> Self {
        Self::from_raw(B::mul_scalar_1d(&self.data, &s.data))
    }

    pub fn add_scalar(&self, s: &Scalar<B>) -> Self {
        Self::from_raw(B::add_scalar_1d(&self.data, &s.data))
    }

    pub fn sum(&self) -> Scalar<B> {
        Scalar::from_raw(B::sum_1d(&self.data))
    }

    pub fn mean(&self) -> Scalar<B> {
        Scalar::from_raw(B::mean_1d(&self.data))
    }

    pub fn min(&self) -> Scalar<B> {
        Scalar::from_raw(B::min_1d(&self.data))
    }

    pub fn max(&self) -> Scalar<B> {
        Scalar::from_raw(B::max_1d(&self.data))
    }

    /// Inner product `Σᵢ selfᵢ · otherᵢ`.
    pub fn dot(&self, other: &Self) -> Scalar<B> {
        Scalar::from_raw(B::sum_1d(&B::mul_1d(&self.data, &other.data)))
    }

    /// Copy of the elements in `range`.
    ///
    /// # Panics
    /// If `range` is out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Self {
        Self::from_raw(B::slice_1d(&self.data, range))
    }

    /// The same values as an `(n, 1)` matrix, one sample per row.
    pub fn to_column(&self) -> Tensor2D<B> {
        Tensor2D::from_raw(B::column_2d(&self.data))
    }

    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_1d(&self.data)
    }
}
