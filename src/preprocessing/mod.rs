//! Data preprocessing.
//!
//! Transformers follow a fitted/unfitted split: a [`Transformer`] learns its
//! parameters with `fit` and returns a [`FittedTransformer`] that can transform,
//! invert and serialize.
//!
//! The housing pipeline only needs min-max scaling of single columns, see
//! [`scaling::minmax`].
//!
//! # Example
//!
//! ```rust
//! use housing_regression::backend::{CpuBackend, Tensor1D};
//! use housing_regression::preprocessing::{FittedTransformer, MinMaxScaler, Transformer};
//!
//! let prices = Tensor1D::<CpuBackend>::new(vec![1.0, 5.0, 3.0]);
//! let fitted = MinMaxScaler::new().fit(&prices).unwrap();
//! assert_eq!(fitted.transform(&prices).unwrap().to_vec(), vec![0.0, 1.0, 0.5]);
//! ```

pub mod scaling;
pub mod traits;

pub use scaling::{
    denormalize, normalize, FittedMinMaxScaler, MinMaxBounds, MinMaxScaler, NormalizedTensor,
};
pub use traits::{FittedTransformer, Transformer};
