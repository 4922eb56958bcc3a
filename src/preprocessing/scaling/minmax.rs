//! Min-max scaling of a single column to `[0, 1]`.
//!
//! ```text
//! scaled = (x - min) / (max - min)
//! x      = scaled * (max - min) + min
//! ```
//!
//! A column whose minimum equals its maximum cannot be scaled and is rejected
//! with [`RegressionError::ConstantColumn`].

use crate::backend::{Backend, Scalar, Tensor1D};
use crate::error::{RegressionError, Result};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Observed range of a column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxBounds {
    pub min: f64,
    pub max: f64,
}

impl MinMaxBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Scales one host value.
    pub fn normalize_value(&self, x: f64) -> f64 {
        (x - self.min) / self.range()
    }

    /// Maps one scaled value back to the original units.
    pub fn denormalize_value(&self, scaled: f64) -> f64 {
        scaled * self.range() + self.min
    }

    fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(RegressionError::NumericalError(format!(
                "non-finite bounds [{}, {}]",
                self.min, self.max
            )));
        }
        if self.max == self.min {
            return Err(RegressionError::ConstantColumn { value: self.min });
        }
        if self.max < self.min {
            return Err(RegressionError::InvalidParameter(format!(
                "bounds max {} is below min {}",
                self.max, self.min
            )));
        }
        Ok(())
    }

    /// Bounds of `values`.
    ///
    /// # Errors
    /// Empty input, any non-finite value, or a constant column.
    pub fn observe<B: Backend>(values: &Tensor1D<B>) -> Result<Self> {
        if values.is_empty() {
            return Err(RegressionError::EmptyData(
                "cannot normalize an empty column".to_string(),
            ));
        }
        // min/max skip NaN
        if values.to_vec().iter().any(|v| !v.is_finite()) {
            return Err(RegressionError::NumericalError(
                "column contains non-finite values".to_string(),
            ));
        }
        let bounds = Self::new(values.min().to_f64(), values.max().to_f64());
        bounds.validate()?;
        Ok(bounds)
    }
}

/// A scaled column together with the bounds it was scaled with.
#[derive(Clone, Debug)]
pub struct NormalizedTensor<B: Backend> {
    pub tensor: Tensor1D<B>,
    pub min: f64,
    pub max: f64,
}

impl<B: Backend> NormalizedTensor<B> {
    pub fn bounds(&self) -> MinMaxBounds {
        MinMaxBounds::new(self.min, self.max)
    }

    /// Original values, up to rounding.
    pub fn denormalize(&self) -> Tensor1D<B> {
        denormalize(&self.tensor, self.min, self.max)
    }
}

/// Scales `values` to `[0, 1]`.
pub fn normalize<B: Backend>(values: &Tensor1D<B>) -> Result<NormalizedTensor<B>> {
    let bounds = MinMaxBounds::observe(values)?;
    Ok(NormalizedTensor {
        tensor: scale_with(values, &bounds),
        min: bounds.min,
        max: bounds.max,
    })
}

/// Inverse of [`normalize`].
pub fn denormalize<B: Backend>(scaled: &Tensor1D<B>, min: f64, max: f64) -> Tensor1D<B> {
    unscale_with(scaled, &MinMaxBounds::new(min, max))
}

fn scale_with<B: Backend>(values: &Tensor1D<B>, bounds: &MinMaxBounds) -> Tensor1D<B> {
    values
        .add_scalar(&Scalar::new(-bounds.min))
        .scale(&Scalar::new(1.0 / bounds.range()))
}

fn unscale_with<B: Backend>(scaled: &Tensor1D<B>, bounds: &MinMaxBounds) -> Tensor1D<B> {
    scaled
        .scale(&Scalar::new(bounds.range()))
        .add_scalar(&Scalar::new(bounds.min))
}

/// Unfitted min-max scaler over one column.
#[derive(Clone, Debug)]
pub struct MinMaxScaler<B: Backend> {
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for MinMaxScaler<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> MinMaxScaler<B> {
    pub fn new() -> Self {
        Self {
            _backend: PhantomData,
        }
    }
}

impl<B: Backend> Transformer<B> for MinMaxScaler<B> {
    type Input = Tensor1D<B>;
    type Output = Tensor1D<B>;
    type Params = MinMaxBounds;
    type Fitted = FittedMinMaxScaler<B>;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted> {
        Ok(FittedMinMaxScaler {
            bounds: MinMaxBounds::observe(data)?,
            _backend: PhantomData,
        })
    }
}

/// Fitted min-max scaler.
#[derive(Clone, Debug)]
pub struct FittedMinMaxScaler<B: Backend> {
    bounds: MinMaxBounds,
    _backend: PhantomData<B>,
}

impl<B: Backend> FittedMinMaxScaler<B> {
    pub fn bounds(&self) -> MinMaxBounds {
        self.bounds
    }
}

impl<B: Backend> FittedTransformer<B> for FittedMinMaxScaler<B> {
    type Input = Tensor1D<B>;
    type Output = Tensor1D<B>;
    type Params = MinMaxBounds;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output> {
        Ok(scale_with(data, &self.bounds))
    }

    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input> {
        Ok(unscale_with(data, &self.bounds))
    }

    fn extract_params(&self) -> Self::Params {
        self.bounds
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            bounds: params,
            _backend: PhantomData,
        })
    }
}
