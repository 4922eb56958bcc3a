//! Models with their training state encoded in the type.

pub mod linear;
pub mod state;

pub use linear::{LayerSnapshot, LinearModel, LinearParams, LinearRegression};
pub use state::{Fitted, Unfitted};

use crate::backend::Backend;
use crate::error::Result;

/// A model that can be trained with explicit forward and backward passes.
pub trait TrainableModel<B: Backend> {
    type Input;
    type Prediction;
    type Params;
    type Gradients;
    type Output;

    fn forward(&self, input: &Self::Input) -> Self::Prediction;

    /// Gradients of the loss w.r.t. the parameters, given ∂L/∂prediction.
    fn backward(&self, input: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients;

    fn params(&self) -> &Self::Params;

    fn update_params(&mut self, new_params: &Self::Params);

    /// Host copy of the current weights and bias, for observers.
    fn snapshot(&self) -> LayerSnapshot;

    fn into_fitted(self) -> Self::Output;
}

/// A trained model used for prediction and persistence.
pub trait InferenceModel<B: Backend> {
    type InputSingle;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;
    /// Plain serializable parameters.
    type ParamsRepr;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle;

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch;

    fn extract_params(&self) -> Self::ParamsRepr;

    fn from_params(params: Self::ParamsRepr) -> Result<Self>
    where
        Self: Sized;
}
