//! # Backend Abstraction
//!
//! Tensor storage and arithmetic sit behind the [`Backend`] trait so the model,
//! loss, optimizer and trainer are written once and run on any implementation.
//!
//! ## Available Backends
//!
//! | Backend          | Feature   | Storage                     |
//! |------------------|-----------|-----------------------------|
//! | `CpuBackend`     | (always)  | `Vec<f64>`, row-major       |
//! | `NdarrayBackend` | `ndarray` | `ndarray::Array1/Array2`    |
//!
//! ## Example
//!
//! ```rust
//! use housing_regression::backend::{CpuBackend, Tensor1D, Tensor2D};
//!
//! let x: Tensor2D<CpuBackend> = Tensor2D::new(vec![1.0, 2.0, 3.0], 3, 1);
//! let w: Tensor1D<CpuBackend> = Tensor1D::new(vec![2.0]);
//! assert_eq!(x.dot(&w).to_vec(), vec![2.0, 4.0, 6.0]);
//! ```
//!
//! The typed wrappers ([`Tensor1D`], [`Tensor2D`], [`Scalar`]) carry the backend as a
//! phantom parameter, so values from two backends never mix.

use std::fmt::Debug;
use std::ops::Range;

pub mod cpu;
pub use cpu::{CpuBackend, CpuTensor2D};

#[cfg(feature = "ndarray")]
mod ndarray_backend;
#[cfg(feature = "ndarray")]
/// Backend backed by the `ndarray` crate.
pub use ndarray_backend::{NdarrayBackend, NdarrayTensor2D};

/// Scalar value representation and arithmetic operations.
pub mod scalar;
/// One-dimensional tensor abstraction.
pub mod tensor1d;
/// Two-dimensional tensor abstraction.
pub mod tensor2d;

pub use scalar::{Scalar, ScalarOps};
pub use tensor1d::Tensor1D;
pub use tensor2d::Tensor2D;

/// Minimal set of tensor operations needed to fit and run a linear model.
///
/// All methods are associated functions: a backend is a zero-sized marker type and
/// the tensors themselves are plain data.
///
/// # Panics
///
/// Binary element-wise operations and products panic on shape mismatch. Callers
/// inside this crate check shapes first and return
/// [`RegressionError::ShapeMismatch`](crate::error::RegressionError::ShapeMismatch).
pub trait Backend: Clone + Copy + Debug + 'static {
    /// Scalar type supporting arithmetic operations.
    type Scalar: ScalarOps;

    /// One-dimensional tensor type.
    type Tensor1D: Clone + Debug + Send + Sync;

    /// Two-dimensional tensor type.
    type Tensor2D: Clone + Debug + Send + Sync;

    // --- Constructors ---

    /// Creates a 1D tensor filled with zeros.
    fn zeros_1d(len: usize) -> Self::Tensor1D;

    /// Constructs a 1D tensor from owned data.
    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D;

    /// Constructs a 2D tensor from row-major data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D;

    /// Reinterprets a 1D tensor of length `n` as an `(n, 1)` column.
    fn column_2d(t: &Self::Tensor1D) -> Self::Tensor2D;

    fn scalar_f64(value: f64) -> Self::Scalar;

    // --- Host access ---

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64>;

    /// Row-major copy of the matrix contents.
    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64>;

    fn len_1d(t: &Self::Tensor1D) -> usize;

    /// Returns `(rows, cols)`.
    fn shape_2d(t: &Self::Tensor2D) -> (usize, usize);

    // --- Element-wise (1D) ---

    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;
    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;
    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;
    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;

    // --- Reductions ---

    fn sum_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Arithmetic mean. `NaN` for an empty tensor.
    fn mean_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Smallest element. `+inf` for an empty tensor.
    fn min_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Largest element. `-inf` for an empty tensor.
    fn max_1d(t: &Self::Tensor1D) -> Self::Scalar;

    // --- Linear algebra ---

    /// `m · v` for `m` of shape `(rows, cols)` and `v` of length `cols`.
    fn matvec(m: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor1D;

    /// `mᵀ · v` for `m` of shape `(rows, cols)` and `v` of length `rows`.
    fn matvec_transposed(m: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor1D;

    // --- Slicing ---

    fn slice_1d(t: &Self::Tensor1D, range: Range<usize>) -> Self::Tensor1D;

    fn slice_rows_2d(t: &Self::Tensor2D, range: Range<usize>) -> Self::Tensor2D;
}
