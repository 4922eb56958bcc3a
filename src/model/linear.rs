//! Linear regression with compile-time state tracking:
//! - [`LinearRegression`] = `LinearModel<B, Unfitted>`, used during training.
//! - `LinearModel<B, Fitted>`, inference-only and serializable.
//!
//! The house price model is a single dense unit with bias and identity activation:
//! `price = w · sqft + b`, both sides scaled to `[0, 1]`.

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::error::{RegressionError, Result};
use crate::model::{Fitted, InferenceModel, TrainableModel, Unfitted};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Trainable parameters of a linear model: weights and bias.
#[derive(Clone, Debug)]
pub struct LinearParams<B: Backend> {
    pub weights: Tensor1D<B>,
    pub bias: Scalar<B>,
}

/// Host copy of a linear layer's parameters.
///
/// Doubles as the serializable representation of a fitted model and as the view
/// handed to training observers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LayerSnapshot {
    /// Number of trainable values (weights plus bias).
    pub fn param_count(&self) -> usize {
        self.weights.len() + 1
    }
}

impl<B: Backend> From<&LinearParams<B>> for LayerSnapshot {
    fn from(params: &LinearParams<B>) -> Self {
        Self {
            weights: params.weights.to_vec(),
            bias: params.bias.to_f64(),
        }
    }
}

impl<B: Backend> TryFrom<LayerSnapshot> for LinearParams<B> {
    type Error = RegressionError;

    fn try_from(value: LayerSnapshot) -> Result<Self> {
        if value.weights.is_empty() {
            return Err(RegressionError::InvalidParameter(
                "linear layer needs at least one weight".to_string(),
            ));
        }
        if !value.bias.is_finite() || value.weights.iter().any(|w| !w.is_finite()) {
            return Err(RegressionError::NumericalError(
                "non-finite model parameters".to_string(),
            ));
        }
        Ok(Self {
            weights: Tensor1D::new(value.weights),
            bias: Scalar::new(value.bias),
        })
    }
}

/// A linear model with its state encoded at the type level.
///
/// - `S = Unfitted`: implements [`TrainableModel`].
/// - `S = Fitted`: implements [`InferenceModel`].
///
/// `predict()` on an untrained model does not compile.
#[derive(Clone, Debug)]
pub struct LinearModel<B: Backend, S> {
    params: LinearParams<B>,
    _state: PhantomData<S>,
}

impl<B: Backend, S> LinearModel<B, S> {
    pub fn n_features(&self) -> usize {
        self.params.weights.len()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.params.weights.to_vec()
    }

    pub fn bias(&self) -> f64 {
        self.params.bias.to_f64()
    }
}

impl<B: Backend> LinearModel<B, Fitted> {
    pub fn new(params: LinearParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}

/// `y = w^T x + b`.
///
/// - Single sample: [`Tensor1D<B>`] -> [`Scalar<B>`]
/// - Batch: [`Tensor2D<B>`] -> [`Tensor1D<B>`]
impl<B: Backend> InferenceModel<B> for LinearModel<B, Fitted> {
    type InputSingle = Tensor1D<B>;
    type InputBatch = Tensor2D<B>;
    type OutputSingle = Scalar<B>;
    type OutputBatch = Tensor1D<B>;
    type ParamsRepr = LayerSnapshot;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle {
        self.params.weights.dot(input) + self.params.bias
    }

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch {
        input.dot(&self.params.weights).add_scalar(&self.params.bias)
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        (&self.params).into()
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self> {
        Ok(Self::new(LinearParams::try_from(params)?))
    }
}

/// Forward pass: `X @ w + b`
/// Backward pass: `∇w = X^T · grad`, `∇b = sum(grad)`
impl<B: Backend> TrainableModel<B> for LinearModel<B, Unfitted> {
    type Params = LinearParams<B>;
    type Gradients = LinearParams<B>;
    type Prediction = Tensor1D<B>;
    type Input = Tensor2D<B>;
    type Output = LinearModel<B, Fitted>;

    fn forward(&self, x: &Self::Input) -> Self::Prediction {
        x.dot(&self.params.weights).add_scalar(&self.params.bias)
    }

    fn backward(&self, x: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients {
        LinearParams {
            weights: x.tdot(grad_output),
            bias: grad_output.sum(),
        }
    }

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn update_params(&mut self, params: &Self::Params) {
        self.params = params.clone();
    }

    fn snapshot(&self) -> LayerSnapshot {
        (&self.params).into()
    }

    fn into_fitted(self) -> LinearModel<B, Fitted> {
        LinearModel::<B, Fitted>::new(self.params)
    }
}

/// An **unfitted** linear regression model.
pub type LinearRegression<B> = LinearModel<B, Unfitted>;

impl<B: Backend> LinearRegression<B> {
    /// Zero-initialized weights and bias.
    pub fn new(n_features: usize) -> Self {
        Self::from_params(LinearParams {
            weights: Tensor1D::zeros(n_features),
            bias: Scalar::new(0.0),
        })
    }

    /// Dense layer initialization: weights drawn Glorot-uniform from
    /// `U(-limit, limit)` with `limit = sqrt(6 / (fan_in + fan_out))`, bias zero.
    /// A seed makes the draw reproducible.
    pub fn create(n_features: usize, seed: Option<u64>) -> Self {
        let limit = (6.0 / (n_features as f64 + 1.0)).sqrt();
        let weights = match seed {
            Some(seed) => glorot_weights(&mut StdRng::seed_from_u64(seed), n_features, limit),
            None => glorot_weights(&mut rand::rng(), n_features, limit),
        };
        Self::from_params(LinearParams {
            weights: Tensor1D::new(weights),
            bias: Scalar::new(0.0),
        })
    }

    /// Warm start from explicit parameters.
    pub fn from_params(params: LinearParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}

fn glorot_weights<R: Rng + ?Sized>(rng: &mut R, n: usize, limit: f64) -> Vec<f64> {
    (0..n).map(|_| rng.random_range(-limit..=limit)).collect()
}
